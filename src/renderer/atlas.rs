use std::collections::HashMap;
use std::path::Path;

use image::{GenericImageView, RgbaImage, SubImage};
use log::info;
use thiserror::Error;

/// Number of byte-addressable glyphs (one per CP437 code).
pub const GLYPH_COUNT: usize = 256;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to load tileset image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("tile size must be greater than zero")]
    ZeroTileSize,
    #[error("tileset holds {found} tiles, need at least {required}")]
    TooFewTiles { found: usize, required: usize },
    #[error("glyph {code:#04x} maps to tile {index}, but the tileset has only {tiles} tiles")]
    GlyphIndexOutOfRange { code: u8, index: usize, tiles: usize },
    #[error("malformed glyph map: {0}")]
    GlyphMap(#[from] serde_json::Error),
}

// ── Tile ─────────────────────────────────────────────────────────────────────

/// Handle to one square region of the atlas image.
///
/// `index` is the slicing order (row-major, starting at 0).  `x`/`y` are the
/// top-left pixel of the region inside the source image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub index: usize,
    pub x: u32,
    pub y: u32,
}

// ── TilesetAtlas ─────────────────────────────────────────────────────────────

/// A fixed-grid tileset sliced into equally sized tiles, with a byte-indexed
/// glyph view for text.
///
/// Read-only after construction; share it by reference.
#[derive(Debug)]
pub struct TilesetAtlas {
    image: RgbaImage,
    tile_size: u32,
    cols: u32,
    rows: u32,
    tiles: Vec<Tile>,
    glyphs: [Option<Tile>; GLYPH_COUNT],
}

impl TilesetAtlas {
    /// Open and decode `path`, then slice it with [`from_image`](Self::from_image).
    pub fn load(path: impl AsRef<Path>, tile_size: u32) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let atlas = Self::from_image(img, tile_size)?;
        info!(
            "tileset {}: {}x{} tiles of {}px",
            path.display(),
            atlas.cols,
            atlas.rows,
            tile_size
        );
        Ok(atlas)
    }

    /// Decode an in-memory encoded image (PNG bytes, e.g. from `include_bytes!`).
    pub fn from_memory(bytes: &[u8], tile_size: u32) -> Result<Self, AtlasError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_image(img, tile_size)
    }

    /// Slice `image` into `tile_size` squares, rows then columns.
    ///
    /// Pixels past the last whole tile on either axis are dropped.  Fails when
    /// fewer than [`GLYPH_COUNT`] tiles result, since the byte view must cover
    /// every code.
    pub fn from_image(image: RgbaImage, tile_size: u32) -> Result<Self, AtlasError> {
        if tile_size == 0 {
            return Err(AtlasError::ZeroTileSize);
        }
        let (img_w, img_h) = image.dimensions();
        let cols = img_w / tile_size;
        let rows = img_h / tile_size;

        let tiles: Vec<Tile> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .enumerate()
            .map(|(index, (row, col))| Tile { index, x: col * tile_size, y: row * tile_size })
            .collect();

        if tiles.len() < GLYPH_COUNT {
            return Err(AtlasError::TooFewTiles { found: tiles.len(), required: GLYPH_COUNT });
        }

        let glyphs = std::array::from_fn(|code| Some(tiles[code]));
        Ok(Self { image, tile_size, cols, rows, tiles, glyphs })
    }

    /// Rebuild the byte view from an explicit `code -> tile index` map.
    ///
    /// Codes absent from `map` become unmapped; text drawing skips them.
    pub fn with_glyph_map(mut self, map: &HashMap<u8, usize>) -> Result<Self, AtlasError> {
        let mut glyphs = [None; GLYPH_COUNT];
        for (&code, &index) in map {
            let tile = self.tiles.get(index).copied().ok_or(AtlasError::GlyphIndexOutOfRange {
                code,
                index,
                tiles: self.tiles.len(),
            })?;
            glyphs[code as usize] = Some(tile);
        }
        self.glyphs = glyphs;
        Ok(self)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Grid dimensions of the sliced image as `(cols, rows)`.
    pub fn grid(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// Every sliced tile in slicing order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Tile drawn for byte `code`, or `None` if a glyph map left it unmapped.
    pub fn glyph(&self, code: u8) -> Option<&Tile> {
        self.glyphs[code as usize].as_ref()
    }

    /// Borrowed view of the pixels behind `tile`, or `None` if the tile does
    /// not lie inside this atlas' image.
    pub fn pixels(&self, tile: &Tile) -> Option<SubImage<&RgbaImage>> {
        let (w, h) = self.image.dimensions();
        let fits = |start: u32, extent: u32| {
            start.checked_add(self.tile_size).is_some_and(|end| end <= extent)
        };
        if !fits(tile.x, w) || !fits(tile.y, h) {
            return None;
        }
        Some(self.image.view(tile.x, tile.y, self.tile_size, self.tile_size))
    }
}

/// Parse a glyph map from a JSON object of `"code": tile_index` pairs.
///
/// ```json
/// { "65": 33, "66": 34 }
/// ```
pub fn glyph_map_from_json(json: &str) -> Result<HashMap<u8, usize>, AtlasError> {
    Ok(serde_json::from_str(json)?)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn strip(tile: u32, count: u32) -> RgbaImage {
        RgbaImage::from_fn(tile, tile * count, |_, y| Rgba([(y / tile) as u8, 0, 0, 255]))
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let err = TilesetAtlas::from_image(strip(2, 256), 0).unwrap_err();
        assert!(matches!(err, AtlasError::ZeroTileSize));
    }

    #[test]
    fn too_few_tiles_is_rejected() {
        let err = TilesetAtlas::from_image(strip(2, 255), 2).unwrap_err();
        assert!(matches!(err, AtlasError::TooFewTiles { found: 255, required: 256 }));
    }

    #[test]
    fn pixels_view_covers_the_tile() {
        let atlas = TilesetAtlas::from_image(strip(2, 256), 2).unwrap();
        let t = *atlas.glyph(7).unwrap();
        let view = atlas.pixels(&t).unwrap();
        assert_eq!(view.dimensions(), (2, 2));
        assert_eq!(view.get_pixel(1, 1), Rgba([7, 0, 0, 255]));
    }

    #[test]
    fn pixels_rejects_foreign_tiles() {
        let atlas = TilesetAtlas::from_image(strip(2, 256), 2).unwrap();
        assert!(atlas.pixels(&Tile { index: 0, x: 1, y: 0 }).is_none());
        assert!(atlas.pixels(&Tile { index: 0, x: 0, y: u32::MAX }).is_none());
    }

    #[test]
    fn glyph_map_json_parses_numeric_keys() {
        let map = glyph_map_from_json(r#"{ "65": 3, "255": 0 }"#).unwrap();
        assert_eq!(map.get(&65), Some(&3));
        assert_eq!(map.get(&255), Some(&0));
    }

    #[test]
    fn glyph_map_json_rejects_out_of_byte_range_keys() {
        assert!(glyph_map_from_json(r#"{ "256": 3 }"#).is_err());
    }
}
