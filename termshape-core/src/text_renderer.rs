//! The library's public facade: wires [`FontArena`] → `termshape_shape`
//! → [`CellRenderer`]/[`GlyphAtlas`]/[`SymbolRenderer`]/[`EmojiComposer`]
//! into a single pixel-buffer renderer, per spec §2's flow diagram.
//!
//! Grounded in `beamterm-core::gl::TerminalGrid`, which wires
//! `FontAtlas` + `SelectionTracker` + GL buffers into one type callers
//! drive with `upload`/`draw`; `TextRenderer` plays the same role over
//! a CPU RGBA buffer instead of a GL context (GPU surface ownership is
//! out of scope per spec §1).

use termshape_data::{CellEffects, Error, FontStyle, Result, Rgba8, SizeQ};
use termshape_unicode::{EastAsianMode, UnicodeOracle};

use crate::atlas::GlyphAtlas;
use crate::cell::CellRenderer;
use crate::emoji::{ComponentTile, EmojiComposer};
use crate::fonts::{FontArena, FontId};
use crate::raster::rasterize_outline;
use crate::symbol::SymbolRenderer;

/// Owns every stateful component of the rendering pipeline and exposes
/// the one operation callers actually need: render a line of shaped
/// text into a caller-owned RGBA buffer at the terminal grid's cell
/// granularity.
pub struct TextRenderer {
    fonts: FontArena,
    cells: CellRenderer,
    atlas: GlyphAtlas,
    symbols: SymbolRenderer,
    emoji: EmojiComposer,
    east_asian_mode: EastAsianMode,
}

impl TextRenderer {
    /// Creates a renderer for a `cell_w x cell_h` monospace grid,
    /// backed by an atlas of `atlas_w x atlas_h` pixels (spec §4.4/§4.5).
    pub fn new(cell_w: u32, cell_h: u32, atlas_w: u32, atlas_h: u32, east_asian_mode: EastAsianMode) -> Self {
        Self {
            fonts: FontArena::new(),
            cells: CellRenderer::new(cell_w, cell_h),
            atlas: GlyphAtlas::new(atlas_w, atlas_h),
            symbols: SymbolRenderer::new(),
            emoji: EmojiComposer::new(),
            east_asian_mode,
        }
    }

    /// Loads a font, returning a handle stable for this renderer's
    /// lifetime.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<FontId> {
        self.fonts.load(bytes)
    }

    /// The glyph atlas backing this renderer, for callers that upload
    /// packed rectangles to a GPU texture themselves (spec §6's GPU
    /// surface provider collaborator).
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Mutable access to the glyph atlas, for evicting or inspecting
    /// packed rectangles directly.
    pub fn atlas_mut(&mut self) -> &mut GlyphAtlas {
        &mut self.atlas
    }

    /// Current cell dimensions.
    pub fn cell_size(&self) -> (u32, u32) {
        self.cells.cell_size()
    }

    /// Resizes the cell grid, invalidating the cell cache (spec §4.5/
    /// §9: any cell-size change invalidates everything cached).
    pub fn resize_cells(&mut self, cell_w: u32, cell_h: u32) {
        self.cells.resize(cell_w, cell_h);
        self.atlas.clear();
        self.emoji.clear();
    }

    /// Renders one logical line of `text` into `out`, a row-major
    /// RGBA8 buffer of stride `out_stride` bytes, with its first cell
    /// at pixel offset `(origin_x, origin_y)`.
    ///
    /// Each grapheme cluster occupies as many terminal columns as
    /// [`termshape_unicode::width_str`] reports; symbol code points
    /// (spec §4.6) and multi-code-point emoji sequences (spec §4.7)
    /// are dispatched before the ordinary font path.
    ///
    /// # Errors
    /// Returns an error only if `font_id` doesn't name a font loaded
    /// via [`Self::load_font`].
    #[allow(clippy::too_many_arguments)]
    pub fn render_line(
        &mut self,
        text: &str,
        font_id: FontId,
        size: f32,
        style: FontStyle,
        fg: Rgba8,
        bg: Rgba8,
        effects: CellEffects,
        now_ms: u64,
        out: &mut [u8],
        out_stride: u32,
        origin_x: u32,
        origin_y: u32,
    ) -> Result<()> {
        let font = self
            .fonts
            .get(font_id)
            .ok_or_else(|| Error::invalid_font_data(format!("unknown font id {}", font_id.0)))?;

        let (cell_w, cell_h) = self.cells.cell_size();
        let oracle = UnicodeOracle::new(self.east_asian_mode);
        let graphemes = oracle.graphemes(text);

        let mut column = 0u32;
        for g in &graphemes {
            let s = g.as_str(text);
            let width = oracle.width_str(s).max(1) as u32;
            let cell_x = origin_x + column * cell_w;
            let first = s.chars().next().unwrap_or('\0');
            let code_point = first as u32;

            if let Some(coverage) = self.symbols.render(code_point, cell_w, cell_h) {
                blit_coverage(&coverage, fg, bg, out, out_stride, cell_x, origin_y);
            } else if s.chars().count() > 1
                && !matches!(oracle.emoji_property(first), termshape_unicode::EmojiProperty::None)
            {
                let size_q = SizeQ::quantize(size);
                let units_per_em = font.units_per_em().unwrap_or(1000).max(1);
                let composed = self.emoji.compose(s, None, |c| {
                    rasterize_component(font, c, size_q, units_per_em, cell_h)
                });
                blit_rgba_tile(&composed, out, out_stride, cell_x, origin_y, cell_w * width, cell_h);
            } else {
                let glyph_id = font.glyph_index(code_point).unwrap_or(0);
                self.cells.render_cell_span(
                    font,
                    font_id.0,
                    code_point,
                    glyph_id,
                    SizeQ::quantize(size),
                    style,
                    fg,
                    bg,
                    effects,
                    width,
                    now_ms,
                    out,
                    out_stride,
                    cell_x,
                    origin_y,
                );
            }

            column += width;
        }

        Ok(())
    }
}

/// Rasterizes one emoji component's outline into a monochrome
/// [`ComponentTile`], tinted `fg`-colored text rather than a true
/// color-table (`COLR`/`CBDT`/`sbix`) rasterization — those optional
/// color-emoji tables (spec §6) are not decoded by this pass; see
/// DESIGN.md.
fn rasterize_component(
    font: &termshape_font::FontFile,
    ch: char,
    size: SizeQ,
    units_per_em: u16,
    cell_h: u32,
) -> Option<ComponentTile> {
    let glyph_id = font.glyph_index(ch as u32).unwrap_or(0);
    let outline = font.glyph_outline(glyph_id).ok()?;
    if outline.is_empty() {
        return None;
    }

    let scale = size.to_f32() / units_per_em as f32;
    let advance =
        font.horizontal_metric(glyph_id).map(|m| (m.advance_width as f32 * scale).round().max(1.0) as u32).ok()?;
    let metrics = font.metrics().ok();
    let baseline_y =
        metrics.map(|m| (m.ascent as f32 * scale).round() as i32).unwrap_or(cell_h as i32 * 3 / 4).max(0) as u32;

    let coverage = rasterize_outline(&outline, scale, 0.0, baseline_y as f32, advance, cell_h);
    let mut tile = termshape_data::RasterTile::blank(advance, cell_h);
    for (idx, &c) in coverage.iter().enumerate() {
        if c == 0 {
            continue;
        }
        let (x, y) = (idx as u32 % advance, idx as u32 / advance);
        tile.set(x, y, Rgba8::rgba(0, 0, 0, c));
    }
    Some(ComponentTile { tile, baseline_y })
}

/// Composites a single-channel coverage tile as `fg`-over-`bg` into
/// `out`, clipping to `out`'s bounds.
fn blit_coverage(coverage: &termshape_data::RasterTile, fg: Rgba8, bg: Rgba8, out: &mut [u8], out_stride: u32, x: u32, y: u32) {
    for row in 0..coverage.h {
        for col in 0..coverage.w {
            let Some(px) = coverage.get(col, row) else { continue };
            let color = if px.a > 0 { fg } else { bg };
            write_pixel(out, out_stride, x + col, y + row, color);
        }
    }
}

/// Blits a composed RGBA tile (already straight-alpha colored) into
/// `out`, left-aligned and clipped to `w x h` cells.
fn blit_rgba_tile(tile: &termshape_data::RasterTile, out: &mut [u8], out_stride: u32, x: u32, y: u32, w: u32, h: u32) {
    for row in 0..h.min(tile.h) {
        for col in 0..w.min(tile.w) {
            let Some(px) = tile.get(col, row) else { continue };
            write_pixel(out, out_stride, x + col, y + row, px);
        }
    }
}

fn write_pixel(out: &mut [u8], out_stride: u32, x: u32, y: u32, color: Rgba8) {
    let idx = (y * out_stride + x * 4) as usize;
    if idx + 4 > out.len() {
        return;
    }
    out[idx] = color.r;
    out[idx + 1] = color.g;
    out[idx + 2] = color.b;
    out[idx + 3] = color.a;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_with_no_tables() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        out
    }

    #[test]
    fn unknown_font_id_is_an_error() {
        let mut renderer = TextRenderer::new(8, 16, 256, 256, EastAsianMode::Standard);
        let mut out = vec![0u8; 8 * 16 * 4];
        let err = renderer
            .render_line("a", FontId(0), 12.0, FontStyle::Normal, Rgba8::WHITE, Rgba8::BLACK, CellEffects::empty(), 0, &mut out, 8 * 4, 0, 0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFontData(_)));
    }

    #[test]
    fn renders_powerline_symbol_without_a_glyph() {
        let mut renderer = TextRenderer::new(8, 16, 256, 256, EastAsianMode::Standard);
        let font_id = renderer.load_font(font_with_no_tables()).unwrap();
        let mut out = vec![0u8; 8 * 16 * 4];
        let text = "\u{E0B0}";
        renderer
            .render_line(text, font_id, 12.0, FontStyle::Normal, Rgba8::WHITE, Rgba8::BLACK, CellEffects::empty(), 0, &mut out, 8 * 4, 0, 0)
            .unwrap();
        // top-left pixel of a right-pointing Powerline triangle is always filled
        assert_eq!(&out[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn resize_clears_atlas_and_emoji_cache() {
        let mut renderer = TextRenderer::new(8, 16, 256, 256, EastAsianMode::Standard);
        renderer.resize_cells(10, 20);
        assert_eq!(renderer.cell_size(), (10, 20));
        assert_eq!(renderer.atlas().len(), 0);
    }
}
