use serde::{Deserialize, Serialize};

use crate::template::SceneValue;

// ── Color ──────────────────────────────────────────────────────────────────

/// Opaque RGB triple.  Used as a multiplicative tint for glyphs and as a flat
/// background fill; there is no alpha channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const RED: Self = Self([255, 0, 0]);
    pub const YELLOW: Self = Self([255, 255, 0]);
    pub const GREEN: Self = Self([0, 255, 0]);
    pub const FG1: Self = Self([150, 150, 150]);
    pub const FG2: Self = Self([50, 50, 50]);
    pub const FG3: Self = Self([25, 25, 25]);
    pub const BG: Self = Self([0, 0, 0]);
    pub const WHITE: Self = Self([255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }

    /// Interpret a front-matter value as a colour.
    ///
    /// Accepts a palette name (`"yellow"`, `"fg2"`, case-insensitive) or a
    /// three-element integer list with every channel in `0..=255`.
    pub fn from_scene_value(value: &SceneValue) -> Option<Self> {
        match value {
            SceneValue::String(name) => Palette::from_name(name).map(Palette::color),
            SceneValue::List(items) if items.len() == 3 => {
                let mut rgb = [0u8; 3];
                for (slot, item) in rgb.iter_mut().zip(items) {
                    *slot = u8::try_from(item.as_i64()?).ok()?;
                }
                Some(Self(rgb))
            }
            _ => None,
        }
    }
}

// ── Palette ────────────────────────────────────────────────────────────────

/// The named colours shared by every screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Red,
    Yellow,
    Green,
    Fg1,
    Fg2,
    Fg3,
    Bg,
    White,
}

impl Palette {
    pub const ALL: [Palette; 8] = [
        Palette::Red,
        Palette::Yellow,
        Palette::Green,
        Palette::Fg1,
        Palette::Fg2,
        Palette::Fg3,
        Palette::Bg,
        Palette::White,
    ];

    pub fn color(self) -> Color {
        match self {
            Palette::Red => Color::RED,
            Palette::Yellow => Color::YELLOW,
            Palette::Green => Color::GREEN,
            Palette::Fg1 => Color::FG1,
            Palette::Fg2 => Color::FG2,
            Palette::Fg3 => Color::FG3,
            Palette::Bg => Color::BG,
            Palette::White => Color::WHITE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Red => "red",
            Palette::Yellow => "yellow",
            Palette::Green => "green",
            Palette::Fg1 => "fg1",
            Palette::Fg2 => "fg2",
            Palette::Fg3 => "fg3",
            Palette::Bg => "bg",
            Palette::White => "white",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl From<Palette> for Color {
    fn from(p: Palette) -> Self {
        p.color()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
