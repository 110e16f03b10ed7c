//! Rasterizes a shaped glyph into a cell-sized RGBA tile, applies
//! post-glyph effects, and caches finished cells, per spec §4.5.
//!
//! Grounded in `beamterm-renderer`'s cell/style bit-packing
//! (`GlyphCache`'s `(CompactString, FontStyle)` keys generalize here to
//! [`termshape_data::CellKey`]) and in `beamterm-atlas`'s
//! `GlyphBounds`/`FontStyle` conventions for placement.

use std::collections::HashMap;

use termshape_data::{CellEffects, CellKey, CellTile, FontStyle, Rgba8, SizeQ};
use termshape_font::FontFile;

use crate::raster::rasterize_outline;

/// Default entry-count cap before the next render triggers a sweep
/// (spec §4.5: "default 10000").
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;
/// Default TTL in milliseconds before a cell tile is reclaimed (spec
/// §4.5: "default 60 s").
pub const DEFAULT_TTL_MS: u64 = 60_000;

/// Pixel row (from the top of the cell) at which `OVERLINE` is drawn,
/// per spec §9's open-question resolution: "row 2 from top" is chosen
/// deliberately, not `baseline - cap_height`.
const OVERLINE_ROW: u32 = 2;

/// Ratio applied to foreground alpha for the `DIM` effect (spec §4.5).
const DIM_ALPHA_FACTOR: f32 = 0.5;

/// How a rasterized glyph outline is placed within its cell, per spec
/// §4.5: "placed inside the cell according to an alignment policy:
/// `{snap_to_pixel, center_glyphs, align_baseline}`".
///
/// `snap_to_pixel` is always effectively on: this renderer only ever
/// writes to an integer pixel grid (no subpixel/fractional placement
/// is implemented, per the "production-quality anti-aliased/subpixel
/// rasterization" Non-goal), so the field exists to name the policy
/// completely but doesn't gate any branch below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentPolicy {
    pub snap_to_pixel: bool,
    pub center_glyphs: bool,
    pub align_baseline: bool,
}

impl Default for AlignmentPolicy {
    /// `center_glyphs`/`align_baseline` on, matching how a monospace
    /// terminal font is normally set: advance-width-centered glyphs
    /// sitting on a shared baseline.
    fn default() -> Self {
        Self { snap_to_pixel: true, center_glyphs: true, align_baseline: true }
    }
}

/// Rasterizes and composites cells into caller-provided RGBA buffers,
/// with a bounded, TTL'd cache of finished [`CellTile`]s.
///
/// The cache clock is caller-supplied (`now_ms`) rather than read from
/// the OS clock internally, per spec §9 ("no mutable globals...
/// configuration passed explicitly") and to keep eviction
/// deterministic and testable.
pub struct CellRenderer {
    cell_w: u32,
    cell_h: u32,
    max_entries: usize,
    ttl_ms: u64,
    alignment: AlignmentPolicy,
    cache: HashMap<CellKey, CellTile>,
}

impl CellRenderer {
    /// Creates a renderer for a fixed `cell_w x cell_h` monospace grid.
    pub fn new(cell_w: u32, cell_h: u32) -> Self {
        Self {
            cell_w,
            cell_h,
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_ms: DEFAULT_TTL_MS,
            alignment: AlignmentPolicy::default(),
            cache: HashMap::new(),
        }
    }

    /// Overrides the default entry-count cap.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Overrides the default TTL, in milliseconds.
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Overrides the default alignment policy (spec §4.5).
    pub fn with_alignment(mut self, alignment: AlignmentPolicy) -> Self {
        self.alignment = alignment;
        self
    }

    /// Current cell dimensions.
    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_w, self.cell_h)
    }

    /// Changes the cell dimensions, invalidating every cached tile
    /// (spec §4.5: "Dimension changes invalidate the entire cache").
    pub fn resize(&mut self, cell_w: u32, cell_h: u32) {
        if cell_w != self.cell_w || cell_h != self.cell_h {
            self.cell_w = cell_w;
            self.cell_h = cell_h;
            self.cache.clear();
        }
    }

    /// Drops every cached tile, e.g. on font reload (spec §9's open
    /// question: "Spec mandates full invalidation on any font or
    /// cell-size change").
    pub fn invalidate_font(&mut self) {
        self.cache.clear();
    }

    /// Renders one single-width cell into `out`, a row-major RGBA8
    /// buffer of total stride `out_stride` bytes, at pixel offset
    /// `(x, y)`. Equivalent to `render_cell_span(.., span=1, ..)`.
    ///
    /// # Errors
    /// Never fails for in-bounds writes; glyphs the font doesn't have
    /// rasterize to an empty (fully transparent) tile rather than
    /// surfacing [`termshape_data::Error::GlyphNotFound`] (spec §7: the
    /// shaper/renderer substitute `.notdef`, they don't propagate it).
    #[allow(clippy::too_many_arguments)]
    pub fn render_cell(
        &mut self,
        font: &FontFile,
        font_id: u32,
        code_point: u32,
        glyph_id: u16,
        size: SizeQ,
        style: FontStyle,
        fg: Rgba8,
        bg: Rgba8,
        effects: CellEffects,
        now_ms: u64,
        out: &mut [u8],
        out_stride: u32,
        x: u32,
        y: u32,
    ) {
        self.render_cell_span(
            font, font_id, code_point, glyph_id, size, style, fg, bg, effects, 1, now_ms, out, out_stride, x, y,
        );
    }

    /// Renders a glyph that occupies `span` adjacent terminal columns
    /// (e.g. a CJK wide character or a fullwidth symbol, per
    /// `termshape_unicode::width`'s East-Asian-width result) into
    /// `out`, starting at pixel offset `(x, y)`.
    ///
    /// Each column is rasterized, cached, and blitted as its own
    /// `cell_w x cell_h` [`CellTile`] (spec §3's `CellTile` invariant:
    /// "bitmap length = cell_w x cell_h x 4" holds for every cached
    /// tile, never a wider one) — the glyph's outline is scaled and
    /// centered across the full `span * cell_w` advance, then sliced
    /// column-by-column, the way a terminal atlas splits a
    /// double-width glyph's rasterization across two adjacent slots.
    ///
    /// # Errors
    /// See [`Self::render_cell`].
    #[allow(clippy::too_many_arguments)]
    pub fn render_cell_span(
        &mut self,
        font: &FontFile,
        font_id: u32,
        code_point: u32,
        glyph_id: u16,
        size: SizeQ,
        style: FontStyle,
        fg: Rgba8,
        bg: Rgba8,
        effects: CellEffects,
        span: u32,
        now_ms: u64,
        out: &mut [u8],
        out_stride: u32,
        x: u32,
        y: u32,
    ) {
        self.sweep(now_ms);
        let span = span.max(1);

        for slot in 0..span {
            let key = CellKey {
                code_point,
                font_id,
                size,
                style,
                fg: fg.to_u32(),
                bg: bg.to_u32(),
                effects,
                slot: slot as u8,
            };

            if !self.cache.contains_key(&key) {
                let tile = self.rasterize(font, glyph_id, size, fg, bg, effects, now_ms, span, slot);
                self.cache.insert(key.clone(), tile);
            }

            let tile = self.cache.get_mut(&key).expect("just inserted or already present");
            tile.last_used = now_ms;
            blit(out, out_stride, x + slot * self.cell_w, y, tile);
        }
    }

    fn sweep(&mut self, now_ms: u64) {
        if self.cache.len() > self.max_entries {
            self.cache.retain(|_, tile| now_ms.saturating_sub(tile.last_used) < self.ttl_ms);
        }
        self.cache.retain(|_, tile| now_ms.saturating_sub(tile.created_at) < self.ttl_ms * 10);
    }

    /// Rasterizes `glyph_id` and returns the `cell_w x cell_h` tile for
    /// column `slot` of a `span`-wide cell (`span=1, slot=0` for an
    /// ordinary single-width glyph). The outline is rasterized once
    /// over the full `span * cell_w` advance, centered in it, and this
    /// call extracts just its `slot`-th `cell_w`-wide column — the
    /// double-width "split into per-column atlas slots" scheme spec
    /// §3's forced-monospace `CellTile` invariant requires.
    #[allow(clippy::too_many_arguments)]
    fn rasterize(
        &self,
        font: &FontFile,
        glyph_id: u16,
        size: SizeQ,
        fg: Rgba8,
        bg: Rgba8,
        effects: CellEffects,
        now_ms: u64,
        span: u32,
        slot: u32,
    ) -> CellTile {
        let mut tile = CellTile::blank(self.cell_w, self.cell_h, now_ms);

        let (fg, bg) = if effects.contains(CellEffects::REVERSE) { (bg, fg) } else { (fg, bg) };
        let fg = if effects.contains(CellEffects::DIM) { fg.scale_alpha(DIM_ALPHA_FACTOR) } else { fg };

        for px in tile.pixels.chunks_exact_mut(4) {
            px[0] = bg.r;
            px[1] = bg.g;
            px[2] = bg.b;
            px[3] = bg.a;
        }

        if effects.contains(CellEffects::INVISIBLE) {
            return tile;
        }

        let units_per_em = font.units_per_em().unwrap_or(1000).max(1);
        let metrics = font.metrics().ok();
        let font_baseline_y = metrics.map(|m| (m.ascent as f32 * size.to_f32() / units_per_em as f32).round() as i32)
            .unwrap_or(self.cell_h as i32 * 3 / 4);
        // `align_baseline` off: `y = baseline_y - glyph.bearing_y` degenerates to
        // top-alignment (bearing_y = the cell top) since this renderer has no
        // separate glyph-bearing concept outside the baseline placement itself.
        let baseline_y = if self.alignment.align_baseline { font_baseline_y } else { 0 };
        tile.baseline_y = baseline_y;

        let full_w = self.cell_w * span;
        if let Ok(outline) = font.glyph_outline(glyph_id) {
            if !outline.is_empty() {
                let scale = size.to_f32() / units_per_em as f32;
                let advance = font
                    .horizontal_metric(glyph_id)
                    .map(|m| (m.advance_width as f32 * scale).round() as i32)
                    .unwrap_or(full_w as i32);
                tile.advance = advance;
                let origin_x = if self.alignment.center_glyphs {
                    ((full_w as i32 - advance) / 2).max(0) as f32
                } else {
                    0.0
                };

                let coverage = rasterize_outline(&outline, scale, origin_x, baseline_y as f32, full_w, self.cell_h);

                let slot_x0 = slot * self.cell_w;
                for yy in 0..self.cell_h {
                    for xx in 0..self.cell_w {
                        let src_x = slot_x0 + xx;
                        let c = coverage[(yy * full_w + src_x) as usize];
                        if c == 0 {
                            continue;
                        }
                        let glyph_px = Rgba8::rgba(fg.r, fg.g, fg.b, ((fg.a as u16 * c as u16) / 255) as u8);
                        let under = tile.get(xx, yy).unwrap_or(bg);
                        tile.set(xx, yy, glyph_px.blend_over(under));
                    }
                }
            }
        }

        let scale = size.to_f32() / units_per_em as f32;
        apply_strokes(&mut tile, effects, fg, baseline_y, metrics, scale);
        tile
    }
}

/// Draws `UNDERLINE`/`STRIKETHROUGH`/`OVERLINE` strokes, after the
/// glyph has been composited (spec §4.5 step order: "underline at
/// `baseline + underline_pos` with `underline_thickness`;
/// strikethrough at `strikethrough_pos`").
///
/// `font_metrics` is `None` when `hhea` itself is missing (a font this
/// malformed can't shape glyphs either, but strokes should still
/// degrade gracefully); `post`/`OS/2` being absent already shows up as
/// zeroed fields on a present `Metrics`, so both cases fall back to
/// the same baseline-relative approximation.
fn apply_strokes(
    tile: &mut CellTile,
    effects: CellEffects,
    color: Rgba8,
    baseline_y: i32,
    font_metrics: Option<termshape_font::tables::hhea::Metrics>,
    scale: f32,
) {
    let cell_h = tile.cell_h as i32;

    if effects.contains(CellEffects::UNDERLINE) {
        let (pos, thickness) = font_metrics
            .filter(|m| m.underline_thickness != 0)
            .map(|m| ((m.underline_pos as f32 * scale).round() as i32, (m.underline_thickness as f32 * scale).round().max(1.0) as i32))
            .unwrap_or((-2, 1));
        // font-unit underline_pos is measured from the baseline, positive
        // upward; a typical negative value (e.g. -75/1000 em) puts the
        // line visually *below* the baseline once subtracted.
        draw_stroke(tile, baseline_y - pos, thickness, color);
    }
    if effects.contains(CellEffects::STRIKETHROUGH) {
        let (pos, thickness) = font_metrics
            .filter(|m| m.strikethrough_thickness != 0)
            .map(|m| ((m.strikethrough_pos as f32 * scale).round() as i32, (m.strikethrough_thickness as f32 * scale).round().max(1.0) as i32))
            .unwrap_or((cell_h / 3, 1));
        draw_stroke(tile, baseline_y - pos, thickness, color);
    }
    if effects.contains(CellEffects::OVERLINE) {
        draw_row(tile, OVERLINE_ROW as i32, color);
    }
}

/// Draws a `thickness`-row-tall horizontal stroke starting at `row`.
fn draw_stroke(tile: &mut CellTile, row: i32, thickness: i32, color: Rgba8) {
    for i in 0..thickness.max(1) {
        draw_row(tile, row + i, color);
    }
}

fn draw_row(tile: &mut CellTile, row: i32, color: Rgba8) {
    if row < 0 || row as u32 >= tile.cell_h {
        return;
    }
    for x in 0..tile.cell_w {
        let under = tile.get(x, row as u32).unwrap_or(Rgba8::TRANSPARENT);
        tile.set(x, row as u32, color.blend_over(under));
    }
}

/// Copies `tile`'s pixels into `out` (row-major RGBA8, `out_stride`
/// bytes per row) at pixel offset `(x, y)`, clipping to `out`'s bounds.
fn blit(out: &mut [u8], out_stride: u32, x: u32, y: u32, tile: &CellTile) {
    for row in 0..tile.cell_h {
        let dst_y = y + row;
        let dst_row_start = (dst_y * out_stride + x * 4) as usize;
        let src_row_start = (row * tile.cell_w * 4) as usize;
        let row_bytes = (tile.cell_w * 4) as usize;

        if dst_row_start + row_bytes > out.len() {
            continue;
        }
        out[dst_row_start..dst_row_start + row_bytes]
            .copy_from_slice(&tile.pixels[src_row_start..src_row_start + row_bytes]);
    }
}

#[cfg(test)]
mod tests {
    use termshape_data::SizeQ;

    use super::*;

    fn font_with_no_tables() -> FontFile {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        FontFile::load(out).unwrap()
    }

    /// A font whose `hhea`/`post`/`OS/2` tables carry explicit
    /// underline/strikethrough metrics, at `units_per_em = 1000`, so a
    /// 10pt render scales them by exactly 1/100.
    fn font_with_stroke_metrics() -> FontFile {
        let mut head = vec![0u8; 54];
        head[18..20].copy_from_slice(&1000u16.to_be_bytes());

        let mut hhea = vec![0u8; 36];
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());

        let mut post = vec![0u8; 12];
        post[8..10].copy_from_slice(&(-200i16).to_be_bytes());
        post[10..12].copy_from_slice(&300i16.to_be_bytes());

        let mut os2 = vec![0u8; 30];
        os2[26..28].copy_from_slice(&500i16.to_be_bytes());
        os2[28..30].copy_from_slice(&200i16.to_be_bytes());

        let tables: Vec<([u8; 4], Vec<u8>)> =
            vec![(*b"head", head), (*b"hhea", hhea), (*b"post", post), (*b"OS/2", os2)];
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        let header_len = 12 + tables.len() * 16;
        let mut offset = header_len;
        let mut directory = Vec::new();
        let mut body = Vec::new();
        for (tag, data) in &tables {
            directory.extend_from_slice(tag);
            directory.extend_from_slice(&0u32.to_be_bytes());
            directory.extend_from_slice(&(offset as u32).to_be_bytes());
            directory.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(data);
            offset += data.len();
        }
        out.extend_from_slice(&directory);
        out.extend_from_slice(&body);
        FontFile::load(out).unwrap()
    }

    #[test]
    fn underline_uses_font_metrics_thickness_when_available() {
        let mut renderer = CellRenderer::new(16, 16);
        let font = font_with_stroke_metrics();
        let mut out = vec![0u8; 16 * 16 * 4];
        renderer.render_cell(
            &font,
            0,
            'A' as u32,
            0,
            SizeQ::quantize(10.0),
            FontStyle::Normal,
            Rgba8::WHITE,
            Rgba8::rgba(0, 0, 0, 0),
            CellEffects::UNDERLINE,
            0,
            &mut out,
            16 * 4,
            0,
            0,
        );
        // underline_thickness=300 units @ 1000 upm, 10pt -> 3px thick;
        // three consecutive opaque rows below the baseline.
        let tile = renderer.cache.values().next().unwrap();
        let opaque_rows: usize = (0..tile.cell_h)
            .filter(|&row| (0..tile.cell_w).all(|x| tile.get(x, row).unwrap().a == 255))
            .count();
        assert_eq!(opaque_rows, 3);
    }

    #[test]
    fn invisible_effect_renders_background_only() {
        let mut renderer = CellRenderer::new(8, 8);
        let font = font_with_no_tables();
        let mut out = vec![0u8; 8 * 8 * 4];
        renderer.render_cell(
            &font,
            0,
            'A' as u32,
            0,
            SizeQ::quantize(12.0),
            FontStyle::Normal,
            Rgba8::WHITE,
            Rgba8::BLACK,
            CellEffects::INVISIBLE,
            0,
            &mut out,
            8 * 4,
            0,
            0,
        );
        assert_eq!(&out[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn resize_invalidates_cache() {
        let mut renderer = CellRenderer::new(8, 8);
        let font = font_with_no_tables();
        let mut out = vec![0u8; 8 * 8 * 4];
        renderer.render_cell(
            &font, 0, 'A' as u32, 0, SizeQ::quantize(12.0), FontStyle::Normal,
            Rgba8::WHITE, Rgba8::BLACK, CellEffects::empty(), 0, &mut out, 8 * 4, 0, 0,
        );
        assert_eq!(renderer.cache.len(), 1);
        renderer.resize(10, 10);
        assert_eq!(renderer.cache.len(), 0);
    }

    #[test]
    fn dimension_mismatch_does_not_corrupt_buffer() {
        let mut renderer = CellRenderer::new(4, 4);
        let font = font_with_no_tables();
        let mut out = vec![0u8; 4 * 4 * 4];
        renderer.render_cell(
            &font, 0, 'A' as u32, 0, SizeQ::quantize(12.0), FontStyle::Normal,
            Rgba8::WHITE, Rgba8::BLACK, CellEffects::empty(), 0, &mut out, 4 * 4, 0, 0,
        );
        assert_eq!(out.len(), 4 * 4 * 4);
    }

    #[test]
    fn span_two_caches_two_distinct_cell_w_sized_tiles() {
        let mut renderer = CellRenderer::new(8, 8);
        let font = font_with_no_tables();
        let mut out = vec![0u8; 16 * 8 * 4];
        renderer.render_cell_span(
            &font, 0, '\u{4E2D}' as u32, 0, SizeQ::quantize(12.0), FontStyle::Normal,
            Rgba8::WHITE, Rgba8::BLACK, CellEffects::empty(), 2, 0, &mut out, 16 * 4, 0, 0,
        );
        // Two slots (0 and 1) must be cached, each still cell_w x cell_h.
        assert_eq!(renderer.cache.len(), 2);
        for tile in renderer.cache.values() {
            assert_eq!(tile.pixels.len(), 8 * 8 * 4);
        }
        let keys: std::collections::HashSet<u8> = renderer.cache.keys().map(|k| k.slot).collect();
        assert_eq!(keys, std::collections::HashSet::from([0u8, 1u8]));
    }

    #[test]
    fn align_baseline_off_places_glyph_at_cell_top() {
        let policy = AlignmentPolicy { align_baseline: false, ..AlignmentPolicy::default() };
        let mut renderer = CellRenderer::new(16, 16).with_alignment(policy);
        let font = font_with_stroke_metrics();
        let mut out = vec![0u8; 16 * 16 * 4];
        renderer.render_cell(
            &font, 0, 'A' as u32, 0, SizeQ::quantize(10.0), FontStyle::Normal,
            Rgba8::WHITE, Rgba8::rgba(0, 0, 0, 0), CellEffects::empty(), 0, &mut out, 16 * 4, 0, 0,
        );
        let tile = renderer.cache.values().next().unwrap();
        assert_eq!(tile.baseline_y, 0);
    }

    #[test]
    fn span_one_is_single_slot_zero() {
        let mut renderer = CellRenderer::new(8, 8);
        let font = font_with_no_tables();
        let mut out = vec![0u8; 8 * 8 * 4];
        renderer.render_cell_span(
            &font, 0, 'A' as u32, 0, SizeQ::quantize(12.0), FontStyle::Normal,
            Rgba8::WHITE, Rgba8::BLACK, CellEffects::empty(), 1, 0, &mut out, 8 * 4, 0, 0,
        );
        assert_eq!(renderer.cache.len(), 1);
        assert_eq!(renderer.cache.keys().next().unwrap().slot, 0);
    }
}
