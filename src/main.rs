// Renders one frame of a scene template to a PNG.
//
//     RUST_LOG=info asciirend --tileset cp437_12x12.png \
//         --template screens/status.txt --out frame.png
//
// Front-matter keys the demo understands:
//   fg, bg            palette name or `r, g, b`
//   energy, shields   integers shown in the status line at the bottom row
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use asciirend::format::{Align, padded_string};
use asciirend::{Color, GridConfig, SceneTemplate, TemplateParser, TileRenderer, TilesetAtlas};

#[derive(Parser)]
#[command(about = "Render a scene template with a CP437 tileset")]
struct Args {
    /// Tileset image laid out in CP437 order
    #[arg(long)]
    tileset: PathBuf,

    /// Scene template to draw
    #[arg(long)]
    template: PathBuf,

    /// Grid configuration (JSON); defaults to 98x50 cells of 12px
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured tile size
    #[arg(long)]
    tile_size: Option<u32>,

    /// Output PNG
    #[arg(long, default_value = "frame.png")]
    out: PathBuf,

    /// Print the parsed front matter as JSON
    #[arg(long, default_value_t = false)]
    dump_front_matter: bool,
}

fn color_setting(scene: &SceneTemplate, key: &str, fallback: Color) -> Color {
    scene.get(key).and_then(Color::from_scene_value).unwrap_or(fallback)
}

/// `ENERGY 1000  SHIELDS 0500` along the bottom row.
fn draw_status(
    renderer: &TileRenderer,
    surface: &mut image::RgbaImage,
    scene: &SceneTemplate,
    grid: &GridConfig,
) {
    let Some(row) = grid.rows.checked_sub(1) else { return };
    let mut col = 0;
    let fields = [("ENERGY ", "energy", Color::GREEN), ("SHIELDS ", "shields", Color::YELLOW)];
    for (label, key, color) in fields {
        let Some(value) = scene.get(key).and_then(|v| v.as_i64()) else { continue };
        let field = format!("{label}{}  ", padded_string(value, 4, '0', Align::Right));
        if let Ok(n) = renderer.draw_text(surface, &field, col, row, color, Color::BG) {
            col += n as u32;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut grid = match &args.config {
        Some(path) => {
            GridConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => GridConfig::default(),
    };
    if let Some(ts) = args.tile_size {
        grid.tile_size = ts;
    }

    let atlas = TilesetAtlas::load(&args.tileset, grid.tile_size)
        .with_context(|| format!("loading tileset {}", args.tileset.display()))?;
    let scene = TemplateParser::new()
        .relative_to_template()
        .parse_file(&args.template)?;

    if args.dump_front_matter {
        println!("{}", serde_json::to_string_pretty(&scene.front_matter)?);
    }

    let fg = color_setting(&scene, "fg", Color::FG1);
    let bg = color_setting(&scene, "bg", Color::BG);

    let renderer = TileRenderer::new(&atlas);
    let mut surface = grid.new_surface();
    for p in &scene.placements {
        let drawn = renderer.draw_lines(&mut surface, &p.lines, p.x, p.y, fg, bg);
        info!("{} at [{}, {}]: {drawn}/{} lines", p.source_path, p.x, p.y, p.lines.len());
    }
    draw_status(&renderer, &mut surface, &scene, &grid);

    surface
        .save(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;
    info!("wrote {}", args.out.display());
    Ok(())
}
