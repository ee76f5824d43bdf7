// ── Code page 437 ─────────────────────────────────────────────────────────────
//
// The tileset is laid out in IBM PC order, so text has to become one byte per
// character before it can be drawn.  ASCII maps to itself.  The control range
// also has well-known pictorial forms (☺ ♥ ♪ → ▲ …) which are accepted as an
// alternative spelling of those bytes.

use thiserror::Error;

/// A character that has no single-byte CP437 representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("character {ch:?} at position {position} has no CP437 representation")]
pub struct EncodeError {
    pub ch: char,
    /// Character (not byte) offset into the input string.
    pub position: usize,
}

/// Bytes 0x80–0xFF.
const HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

/// Pictorial forms of bytes 0x00–0x1F.  0x00 has none.
const LOW: [char; 32] = [
    '\0', '☺', '☻', '♥', '♦', '♣', '♠', '•', '◘', '○', '◙', '♂', '♀', '♪', '♫', '☼',
    '►', '◄', '↕', '‼', '¶', '§', '▬', '↨', '↑', '↓', '→', '←', '∟', '↔', '▲', '▼',
];

/// Pictorial form of 0x7F.
const HOUSE: char = '⌂';

/// Map a single character to its CP437 byte.
pub fn encode_char(ch: char) -> Option<u8> {
    if ch.is_ascii() {
        return Some(ch as u8);
    }
    if ch == HOUSE {
        return Some(0x7F);
    }
    if let Some(i) = HIGH.iter().position(|&c| c == ch) {
        return Some(0x80 + i as u8);
    }
    LOW.iter().skip(1).position(|&c| c == ch).map(|i| i as u8 + 1)
}

/// Encode a whole string, failing on the first character that cannot be
/// represented.  On failure no bytes are returned.
pub fn encode(text: &str) -> Result<Vec<u8>, EncodeError> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| encode_char(ch).ok_or(EncodeError { ch, position }))
        .collect()
}

/// Printable form of a CP437 byte.
///
/// Control bytes come back as their pictorial glyph so that a decoded layout
/// row can be shown in a terminal; 0x00 decodes to a space.
pub fn decode(byte: u8) -> char {
    match byte {
        0x00 => ' ',
        0x01..=0x1F => LOW[byte as usize],
        0x7F => HOUSE,
        0x20..=0x7E => byte as char,
        _ => HIGH[(byte - 0x80) as usize],
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
