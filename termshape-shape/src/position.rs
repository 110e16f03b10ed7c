use termshape_font::FontFile;

use crate::buffer::ShapingBuffer;
use crate::features::FeatureSet;

/// GPOS-equivalent positioning: classic kerning, per spec §4.3 step 6.
///
/// For every adjacent glyph pair within `range`, looks up
/// `font.kerning(left, right)` and adds it (still in font units) to
/// the left glyph's `x_advance`. No-ops if `FeatureSet::KERN` isn't
/// enabled, or if the font has no `kern` table (kerning returns 0).
pub fn apply_kerning(
    buffer: &mut ShapingBuffer,
    font: &FontFile,
    range: std::ops::Range<usize>,
    features: FeatureSet,
) {
    if !features.contains(FeatureSet::KERN) || range.len() < 2 {
        return;
    }

    for i in range.start..range.end - 1 {
        let left = buffer.glyph_infos[i].glyph_id;
        let right = buffer.glyph_infos[i + 1].glyph_id;
        let kern = font.kerning(left, right).unwrap_or(0);
        if kern != 0 {
            buffer.positions[i].x_advance += kern as f32;
        }
    }
}

/// Scales every position in `range` from font units to design units
/// by `size / units_per_em` (spec §4.3 step 6), applied once after
/// kerning so the final `x_advance` matches spec §8 scenario 1:
/// "advance_width('=') + advance_width('=') + kern('=','='), scaled to
/// 12pt" — the sum is computed in font units first, then scaled as a
/// whole.
pub fn scale_to_size(
    buffer: &mut ShapingBuffer,
    range: std::ops::Range<usize>,
    size: f32,
    units_per_em: u16,
) {
    if units_per_em == 0 {
        return;
    }
    let scale = size / units_per_em as f32;
    for pos in &mut buffer.positions[range] {
        pos.x_advance *= scale;
        pos.y_advance *= scale;
        pos.x_offset *= scale;
        pos.y_offset *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::GlyphPosition;

    #[test]
    fn scale_applies_uniformly_to_all_components() {
        let mut buffer = ShapingBuffer::new();
        buffer.push(1, 0, GlyphPosition { x_advance: 1000.0, y_advance: 0.0, x_offset: 0.0, y_offset: 0.0 });
        scale_to_size(&mut buffer, 0..1, 12.0, 1000);
        assert_eq!(buffer.positions[0].x_advance, 12.0);
    }

    #[test]
    fn zero_units_per_em_is_a_no_op() {
        let mut buffer = ShapingBuffer::new();
        buffer.push(1, 0, GlyphPosition { x_advance: 1000.0, y_advance: 0.0, x_offset: 0.0, y_offset: 0.0 });
        scale_to_size(&mut buffer, 0..1, 12.0, 0);
        assert_eq!(buffer.positions[0].x_advance, 1000.0);
    }
}
