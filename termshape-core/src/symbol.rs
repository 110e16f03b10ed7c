//! Vector rasterization of a fixed set of terminal-specific symbols,
//! independent of any font file, per spec §4.6.
//!
//! Grounded in `beamterm-atlas`'s treatment of Powerline/box-drawing
//! glyphs as a fixed symbol table rather than font-backed glyphs; the
//! fill predicates below are taken directly from spec §4.6's table.

use termshape_data::RasterTile;

/// Powerline right-pointing triangle separator (``).
pub const POWERLINE_RIGHT_TRIANGLE: u32 = 0xE0B0;
/// Powerline left-pointing triangle separator (``).
pub const POWERLINE_LEFT_TRIANGLE: u32 = 0xE0B2;
/// Powerline thin right separator.
pub const POWERLINE_RIGHT_THIN: u32 = 0xE0B1;
/// Powerline thin left separator.
pub const POWERLINE_LEFT_THIN: u32 = 0xE0B3;
/// Git-branch glyph (``).
pub const GIT_BRANCH: u32 = 0xE0A0;
/// Home glyph (``).
pub const HOME: u32 = 0xF015;

/// Renders the fixed set of terminal symbols spec §4.6 names as direct
/// vector coverage, without consulting any font.
///
/// The renderer is stateless; it exists as a type (rather than a bare
/// function) so `TextRenderer` can hold it alongside the other
/// component caches and so tests can name it the way they name
/// `CellRenderer`/`GlyphAtlas`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolRenderer;

impl SymbolRenderer {
    /// Creates a renderer. Carries no state.
    pub fn new() -> Self {
        Self
    }

    /// Whether `code_point` is one of the symbols this renderer knows
    /// how to draw without a font.
    pub fn handles(&self, code_point: u32) -> bool {
        matches!(
            code_point,
            POWERLINE_RIGHT_TRIANGLE | POWERLINE_LEFT_TRIANGLE | POWERLINE_RIGHT_THIN
                | POWERLINE_LEFT_THIN | GIT_BRANCH | HOME
        )
    }

    /// Rasterizes `code_point` into a `w x h` single-channel coverage
    /// bitmap (carried in the alpha channel of a [`RasterTile`]; RGB is
    /// left at zero, colored at composite time). Returns `None` for a
    /// code point this renderer doesn't own — the caller should fall
    /// through to the font-based path (spec §4.6: "Other codepoints
    /// fall through to the font-based path").
    pub fn render(&self, code_point: u32, w: u32, h: u32) -> Option<RasterTile> {
        let mut tile = RasterTile::blank(w, h);
        match code_point {
            POWERLINE_RIGHT_TRIANGLE => fill_right_triangle(&mut tile),
            POWERLINE_LEFT_TRIANGLE => fill_left_triangle(&mut tile),
            POWERLINE_RIGHT_THIN => fill_thin_separator(&mut tile, true),
            POWERLINE_LEFT_THIN => fill_thin_separator(&mut tile, false),
            GIT_BRANCH => fill_git_branch(&mut tile),
            HOME => fill_home(&mut tile),
            _ => return None,
        }
        Some(tile)
    }
}

fn set_coverage(tile: &mut RasterTile, x: u32, y: u32) {
    tile.set(x, y, termshape_data::Rgba8::rgba(255, 255, 255, 255));
}

/// Fill rule from spec §4.6: `x*h <= (w - y)*w`.
fn fill_right_triangle(tile: &mut RasterTile) {
    let (w, h) = (tile.w, tile.h);
    for y in 0..h {
        for x in 0..w {
            if (x as u64) * (h as u64) <= ((w - y) as u64) * (w as u64) {
                set_coverage(tile, x, y);
            }
        }
    }
}

/// Fill rule from spec §4.6: `x*h >= y*w`.
fn fill_left_triangle(tile: &mut RasterTile) {
    let (w, h) = (tile.w, tile.h);
    for y in 0..h {
        for x in 0..w {
            if (x as u64) * (h as u64) >= (y as u64) * (w as u64) {
                set_coverage(tile, x, y);
            }
        }
    }
}

/// A one-column-wide vertical bar at the cell edge: the left edge for
/// the "right" thin separator (it abuts a preceding cell on its left),
/// the right edge for the "left" variant.
fn fill_thin_separator(tile: &mut RasterTile, at_left_edge: bool) {
    let x = if at_left_edge { 0 } else { tile.w.saturating_sub(1) };
    for y in 0..tile.h {
        set_coverage(tile, x, y);
    }
}

/// A circle with two radial lines, approximating a git-branch glyph.
fn fill_git_branch(tile: &mut RasterTile) {
    let (w, h) = (tile.w as f32, tile.h as f32);
    let cx = w / 2.0;
    let cy = h / 2.0;
    let radius = (w.min(h)) / 4.0;

    for y in 0..tile.h {
        for x in 0..tile.w {
            let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
            let dist = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
            let ring = (dist - radius).abs() <= 0.75;
            let on_vertical_stem = (fx - cx).abs() <= 0.75 && (fy > cy + radius || fy < cy - radius);
            let on_horizontal_branch = (fy - cy).abs() <= 0.75 && fx > cx;
            if ring || on_vertical_stem || on_horizontal_branch {
                set_coverage(tile, x, y);
            }
        }
    }
}

/// A triangular roof over a rectangular base.
fn fill_home(tile: &mut RasterTile) {
    let (w, h) = (tile.w, tile.h);
    let roof_h = h / 2;
    let base_top = roof_h;
    let base_inset = w / 6;

    for y in 0..roof_h {
        // roof widens linearly from the apex down to the full width
        let half_width = ((y as u64) * (w as u64) / roof_h.max(1) as u64 / 2) as u32;
        let cx = w / 2;
        let (lo, hi) = (cx.saturating_sub(half_width), (cx + half_width).min(w));
        for x in lo..hi {
            set_coverage(tile, x, y);
        }
    }

    for y in base_top..h {
        for x in base_inset..w.saturating_sub(base_inset) {
            if x == base_inset || x == w.saturating_sub(base_inset) - 1 || y == h - 1 {
                set_coverage(tile, x, y);
            }
        }
    }
}
