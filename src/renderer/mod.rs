pub mod atlas;
pub mod blend;
pub mod cp437;

use glam::UVec2;
use image::{GenericImageView, RgbaImage};
use log::{debug, warn};

use atlas::{Tile, TilesetAtlas};
use cp437::EncodeError;

use crate::palette::Color;

// ── TileRenderer ─────────────────────────────────────────────────────────────

/// Draws tinted tiles and CP437 text onto an RGBA surface.
///
/// Coordinates are grid cells, not pixels: cell `(col, row)` starts at pixel
/// `(col * tile_size, row * tile_size)`.  Anything falling outside the
/// surface is clipped.
///
/// The renderer only borrows the atlas, so any number of them can be handed
/// out to screens drawing in the same frame.
#[derive(Copy, Clone, Debug)]
pub struct TileRenderer<'a> {
    atlas: &'a TilesetAtlas,
}

impl<'a> TileRenderer<'a> {
    pub fn new(atlas: &'a TilesetAtlas) -> Self {
        Self { atlas }
    }

    pub fn atlas(&self) -> &'a TilesetAtlas {
        self.atlas
    }

    pub fn tile_size(&self) -> u32 {
        self.atlas.tile_size()
    }

    /// Pixel origin of a cell, or `None` if it does not fit in `u32`.
    pub fn cell_origin(&self, col: u32, row: u32) -> Option<UVec2> {
        let ts = self.tile_size();
        Some(UVec2::new(col.checked_mul(ts)?, row.checked_mul(ts)?))
    }

    /// Fill the cell with `bg`, then blend `tile` tinted by `fg` over it.
    pub fn draw_tile(
        &self,
        surface: &mut RgbaImage,
        tile: &Tile,
        col: u32,
        row: u32,
        fg: Color,
        bg: Color,
    ) {
        let Some(origin) = self.cell_origin(col, row) else { return };
        let (sw, sh) = surface.dimensions();
        if origin.x >= sw || origin.y >= sh {
            return;
        }

        let Some(src) = self.atlas.pixels(tile) else { return };
        let ts = self.tile_size();
        let w = ts.min(sw - origin.x);
        let h = ts.min(sh - origin.y);

        for dy in 0..h {
            for dx in 0..w {
                let px = blend::compose(src.get_pixel(dx, dy), fg, bg);
                surface.put_pixel(origin.x + dx, origin.y + dy, px);
            }
        }
    }

    /// Draw the glyph for byte `code`.  Returns `false` (and draws nothing)
    /// when the atlas has no glyph for it.
    pub fn draw_glyph(
        &self,
        surface: &mut RgbaImage,
        code: u8,
        col: u32,
        row: u32,
        fg: Color,
        bg: Color,
    ) -> bool {
        match self.atlas.glyph(code) {
            Some(tile) => {
                self.draw_tile(surface, tile, col, row, fg, bg);
                true
            }
            None => false,
        }
    }

    /// Draw `text` left to right starting at `(col, row)`.
    ///
    /// The whole string is encoded first; if any character is outside CP437
    /// nothing at all is drawn and the error is returned.  Otherwise each byte
    /// is drawn in turn, and a byte without a glyph leaves its cell untouched
    /// without stopping the rest of the string.
    ///
    /// Returns the number of cells drawn.
    pub fn draw_text(
        &self,
        surface: &mut RgbaImage,
        text: &str,
        col: u32,
        row: u32,
        fg: Color,
        bg: Color,
    ) -> Result<usize, EncodeError> {
        let bytes = cp437::encode(text).inspect_err(|e| warn!("draw_text {text:?}: {e}"))?;

        let mut drawn = 0;
        for (i, &code) in bytes.iter().enumerate() {
            let Some(cell) = u32::try_from(i).ok().and_then(|i| col.checked_add(i)) else { break };
            if self.draw_glyph(surface, code, cell, row, fg, bg) {
                drawn += 1;
            } else {
                debug!("draw_text: no glyph for {code:#04x}, skipping cell");
            }
        }
        Ok(drawn)
    }

    /// Draw a block of rows, one [`draw_text`](Self::draw_text) call per line,
    /// starting at `(col, row)` and moving down.  A line that fails to encode
    /// is left blank; the others still draw.
    ///
    /// Returns the number of lines drawn.
    pub fn draw_lines<S: AsRef<str>>(
        &self,
        surface: &mut RgbaImage,
        lines: &[S],
        col: u32,
        row: u32,
        fg: Color,
        bg: Color,
    ) -> usize {
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                let r = row.checked_add(u32::try_from(i).ok()?)?;
                self.draw_text(surface, line.as_ref(), col, r, fg, bg).ok()
            })
            .count()
    }
}
