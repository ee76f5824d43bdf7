pub mod config;
pub mod format;
pub mod palette;
pub mod renderer;
pub mod template;

pub use config::GridConfig;
pub use format::{Align, padded_string};
pub use palette::{Color, Palette};
pub use renderer::TileRenderer;
pub use renderer::atlas::{Tile, TilesetAtlas};
pub use template::{SceneTemplate, SceneValue, TemplateParser, parse_scene_template};
