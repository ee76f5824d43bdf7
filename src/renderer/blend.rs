// ── Per-pixel colour math ─────────────────────────────────────────────────────
//
// Glyph cells are composed in two steps: the tile pixel is tinted by
// multiplying each RGB channel with the foreground colour, then the tinted
// pixel is alpha-blended over an opaque background.  Both steps are pure so
// they can be checked without a surface.

use image::Rgba;

use crate::palette::Color;

/// `a * b / 255`, rounded to nearest.
#[inline]
pub fn mul_channel(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

/// Multiply the RGB channels of `px` by `tint`; alpha is kept as is.
#[inline]
pub fn tint(px: Rgba<u8>, tint: Color) -> Rgba<u8> {
    let [r, g, b, a] = px.0;
    Rgba([
        mul_channel(r, tint.r()),
        mul_channel(g, tint.g()),
        mul_channel(b, tint.b()),
        a,
    ])
}

/// Source-over blend of `src` onto the opaque colour `dst`.  The result is
/// always fully opaque.
#[inline]
pub fn over_opaque(src: Rgba<u8>, dst: Color) -> Rgba<u8> {
    let [r, g, b, a] = src.0;
    let a = a as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    Rgba([mix(r, dst.r()), mix(g, dst.g()), mix(b, dst.b()), 255])
}

/// Final surface pixel for one tile pixel.
#[inline]
pub fn compose(px: Rgba<u8>, fg: Color, bg: Color) -> Rgba<u8> {
    over_opaque(tint(px, fg), bg)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
