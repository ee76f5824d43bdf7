use std::fs;
use std::io;
use std::path::Path;

use glam::UVec2;
use image::{Rgba, RgbaImage};
use serde::Deserialize;
use thiserror::Error;

use crate::palette::Color;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Read(#[from] io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ── GridConfig ────────────────────────────────────────────────────────────────

/// Size of the character grid the game draws into.
///
/// Missing fields in a config file fall back to the defaults: 98 × 50 cells
/// of 12 px, i.e. a 1176 × 600 surface.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of the grid in cells.
    pub cols: u32,
    /// Height of the grid in cells.
    pub rows: u32,
    /// Side length of one square cell in pixels.  Must match the tileset.
    pub tile_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cols: 98, rows: 50, tile_size: 12 }
    }
}

impl GridConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn pixel_width(&self) -> u32 {
        self.cols * self.tile_size
    }

    pub fn pixel_height(&self) -> u32 {
        self.rows * self.tile_size
    }

    /// Top-left pixel of cell `(col, row)`.
    pub fn cell_origin(&self, col: u32, row: u32) -> UVec2 {
        UVec2::new(col, row) * self.tile_size
    }

    /// A surface covering the whole grid, filled with [`Color::BG`].
    pub fn new_surface(&self) -> RgbaImage {
        let [r, g, b] = Color::BG.0;
        RgbaImage::from_pixel(self.pixel_width(), self.pixel_height(), Rgba([r, g, b, 255]))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
