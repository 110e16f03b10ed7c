//! Script/BiDi run segmentation and GSUB/GPOS-equivalent shaping.
//!
//! [`shape`] is the Shaper's single public operation (spec §4.3): it
//! decodes the input, partitions it into script/BiDi runs, resolves
//! Arabic joining forms and Indic syllable reordering, applies
//! ligature substitution and classic kerning, and returns a
//! [`ShapingBuffer`] whose storage order is visual (RTL runs reversed
//! in place) while cluster ids stay in logical order throughout.

mod arabic;
mod buffer;
mod decode;
mod features;
mod indic;
mod ligature;
mod position;
mod segment;

use termshape_data::Result;
use termshape_font::FontFile;
use termshape_unicode::Script;

pub use buffer::{GlyphInfo, GlyphPosition, ShapingBuffer};
pub use decode::{decode_lossy, DecodedChar};
pub use features::FeatureSet;
pub use segment::{segment, Run};

/// Shapes `text` against `font` at `size` (points), per spec §4.3.
///
/// `caller_features` are unioned with the default features
/// (`kern, liga, clig`) and whatever script-contextual features a
/// run's script requires (Arabic joining forms, Indic reordering
/// features); a caller wanting ligatures off should simply omit
/// `FeatureSet::LIGA`/`CLIG` rather than pass an "off" flag.
///
/// `base_direction`: `Some(true)` forces an RTL base paragraph level,
/// `Some(false)` forces LTR, `None` auto-detects per UAX #9 rule P2/P3.
pub fn shape(
    text: &[u8],
    font: &FontFile,
    size: f32,
    caller_features: FeatureSet,
    base_direction: Option<bool>,
) -> Result<ShapingBuffer> {
    let decoded = decode::decode_lossy(text);
    let units_per_em = font.units_per_em().unwrap_or(1000).max(1);

    // segment() re-decodes BiDi/script over the *text*, not our lossy
    // char list, so reconstruct a string with one char per DecodedChar
    // (replacement characters included) to keep offsets aligned.
    let reconstructed: String = decoded.iter().map(|dc| dc.ch).collect();
    let runs = segment::segment(&reconstructed, base_direction);

    // Map `reconstructed`'s char offsets back to `decoded` indices: both
    // sequences have the same length and order, so a byte-offset walk
    // over `reconstructed` lines up 1:1 with `decoded`'s entries.
    let offset_to_index = build_offset_index(&reconstructed);

    let mut buffer = ShapingBuffer::new();

    for run in &runs {
        let start_idx = *offset_to_index.get(&run.start).unwrap_or(&0);
        let end_idx = offset_to_index
            .get(&(run.start + run.len))
            .copied()
            .unwrap_or(decoded.len());

        if start_idx >= end_idx {
            continue;
        }

        let run_chars = &decoded[start_idx..end_idx];
        let features = caller_features
            | FeatureSet::default_features()
            | script_features(run.script);

        let buf_start = buffer.len();
        shape_run(&mut buffer, font, run_chars, run.script, features, size, units_per_em);
        let buf_end = buffer.len();

        if run.is_rtl() {
            buffer.reverse_range(buf_start..buf_end);
        }
    }

    Ok(buffer)
}

fn script_features(script: Script) -> FeatureSet {
    if script == Script::Arabic {
        FeatureSet::arabic_features()
    } else if indic::is_indic_script(script) {
        FeatureSet::indic_features()
    } else {
        FeatureSet::empty()
    }
}

/// Shapes one run's characters into the shared buffer, in font units.
/// Kerning and size scaling are applied to the whole run at the end.
fn shape_run(
    buffer: &mut ShapingBuffer,
    font: &FontFile,
    run_chars: &[DecodedChar],
    script: Script,
    features: FeatureSet,
    size: f32,
    units_per_em: u16,
) {
    let reordered = indic::reorder(run_chars, script);

    let effective_cps: Vec<u32> = if script == Script::Arabic {
        arabic::resolve_forms(&reordered)
    } else {
        reordered.iter().map(|dc| dc.ch as u32).collect()
    };

    let chars: Vec<char> = reordered.iter().map(|dc| dc.ch).collect();
    let use_ligatures = features.contains(FeatureSet::LIGA) || features.contains(FeatureSet::CLIG);

    let start = buffer.len();
    let mut i = 0usize;
    while i < reordered.len() {
        if use_ligatures {
            if let Some((len, glyph_id)) = ligature::match_at(font, &chars, i) {
                let advance: f32 = (i..i + len)
                    .map(|k| advance_for(font, effective_cps[k]))
                    .sum();
                buffer.push(
                    glyph_id,
                    reordered[i].cluster,
                    buffer::GlyphPosition {
                        x_advance: advance,
                        y_advance: 0.0,
                        x_offset: 0.0,
                        y_offset: 0.0,
                    },
                );
                i += len;
                continue;
            }
        }

        let glyph_id = font.glyph_index(effective_cps[i]).unwrap_or(0);
        if glyph_id == 0 {
            log::trace!("no glyph for U+{:04X}, substituting .notdef", effective_cps[i]);
        }
        let advance = advance_for(font, effective_cps[i]);
        buffer.push(
            glyph_id,
            reordered[i].cluster,
            buffer::GlyphPosition { x_advance: advance, y_advance: 0.0, x_offset: 0.0, y_offset: 0.0 },
        );
        i += 1;
    }
    let end = buffer.len();

    position::apply_kerning(buffer, font, start..end, features);
    position::scale_to_size(buffer, start..end, size, units_per_em);
}

fn advance_for(font: &FontFile, cp: u32) -> f32 {
    let glyph_id = font.glyph_index(cp).unwrap_or(0);
    font.horizontal_metric(glyph_id).map(|m| m.advance_width as f32).unwrap_or(0.0)
}

/// Builds a map from byte offset (as measured over `text`) to the
/// index of the `DecodedChar`/char starting at that offset, plus one
/// trailing entry at `text.len()`.
fn build_offset_index(text: &str) -> std::collections::HashMap<usize, usize> {
    let mut map = std::collections::HashMap::with_capacity(text.len() + 1);
    let mut idx = 0usize;
    for (offset, ch) in text.char_indices() {
        map.insert(offset, idx);
        idx += 1;
        let _ = ch;
    }
    map.insert(text.len(), idx);
    map
}

#[cfg(test)]
mod tests {
    use termshape_data::Error;

    use super::*;

    /// Builds a minimal TrueType font with `head`/`hhea`/`hmtx`/`cmap`
    /// tables sufficient for `shape()` to run end to end: every
    /// printable ASCII code point maps to `glyph_id = code_point`,
    /// each glyph has a fixed 600-unit advance, and `units_per_em` is
    /// 1000.
    fn build_test_font() -> FontFile {
        let units_per_em: u16 = 1000;
        let ascent: i16 = 800;
        let descent: i16 = -200;
        let line_gap: i16 = 0;
        let num_glyphs: u16 = 256;

        let mut head = vec![0u8; 54];
        head[18..20].copy_from_slice(&units_per_em.to_be_bytes());
        head[50..52].copy_from_slice(&0u16.to_be_bytes()); // indexToLocFormat: short

        let mut hhea = vec![0u8; 36];
        hhea[4..6].copy_from_slice(&ascent.to_be_bytes());
        hhea[6..8].copy_from_slice(&descent.to_be_bytes());
        hhea[8..10].copy_from_slice(&line_gap.to_be_bytes());
        hhea[34..36].copy_from_slice(&num_glyphs.to_be_bytes());

        let mut hmtx = Vec::new();
        for _ in 0..num_glyphs {
            hmtx.extend_from_slice(&600u16.to_be_bytes());
            hmtx.extend_from_slice(&0i16.to_be_bytes());
        }

        // cmap format 4, identity mapping for BMP code points 0x20..0x7A,
        // the Latin/operator ligature PUA range, and Arabic
        // presentation-form code points used by tests.
        let cmap = build_identity_cmap_format4(&[
            (0x20, 0x7A),
            (0xE100, 0xE107),
            (0xFB00, 0xFB04),
            (0xFE70, 0xFEFC),
        ]);

        build_font(&[(*b"head", head), (*b"hhea", hhea), (*b"hmtx", hmtx), (*b"cmap", cmap)])
    }

    fn build_identity_cmap_format4(ranges: &[(u16, u16)]) -> Vec<u8> {
        // idDelta = 0 and idRangeOffset = 0 makes glyph_id = code point
        // directly (format 4's `cp.wrapping_add(idDelta)` fallback).
        let mut segments: Vec<(u16, u16, i16, u16)> =
            ranges.iter().map(|&(lo, hi)| (lo, hi, 0i16, 0u16)).collect();
        segments.push((0xFFFF, 0xFFFF, 1, 0));

        let seg_count = segments.len() as u16;
        let mut out = Vec::new();
        out.extend_from_slice(&4u16.to_be_bytes()); // format
        out.extend_from_slice(&0u16.to_be_bytes()); // length placeholder
        out.extend_from_slice(&0u16.to_be_bytes()); // language
        out.extend_from_slice(&(seg_count * 2).to_be_bytes()); // segCountX2
        out.extend_from_slice(&0u16.to_be_bytes()); // searchRange
        out.extend_from_slice(&0u16.to_be_bytes()); // entrySelector
        out.extend_from_slice(&0u16.to_be_bytes()); // rangeShift

        for &(_, end, _, _) in &segments {
            out.extend_from_slice(&end.to_be_bytes());
        }
        out.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
        for &(start, _, _, _) in &segments {
            out.extend_from_slice(&start.to_be_bytes());
        }
        for &(_, _, delta, _) in &segments {
            out.extend_from_slice(&(delta as u16).to_be_bytes());
        }
        for &(_, _, _, range_offset) in &segments {
            out.extend_from_slice(&range_offset.to_be_bytes());
        }

        let len = out.len() as u16;
        out[2..4].copy_from_slice(&len.to_be_bytes());

        // Wrap in a minimal cmap table: version, numTables, then one
        // encoding record (platform=3, encoding=1) pointing at the
        // format-4 subtable above.
        let mut table = Vec::new();
        table.extend_from_slice(&0u16.to_be_bytes()); // version
        table.extend_from_slice(&1u16.to_be_bytes()); // numTables
        table.extend_from_slice(&3u16.to_be_bytes()); // platformID
        table.extend_from_slice(&1u16.to_be_bytes()); // encodingID
        let subtable_offset = table.len() as u32 + 4;
        table.extend_from_slice(&subtable_offset.to_be_bytes());
        table.extend_from_slice(&out);
        table
    }

    fn build_font(tables: &[([u8; 4], Vec<u8>)]) -> FontFile {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        let header_len = 12 + tables.len() * 16;
        let mut offset = header_len;
        let mut directory = Vec::new();
        let mut body = Vec::new();
        for (tag, data) in tables {
            directory.extend_from_slice(tag);
            directory.extend_from_slice(&0u32.to_be_bytes());
            directory.extend_from_slice(&(offset as u32).to_be_bytes());
            directory.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(data);
            offset += data.len();
        }

        out.extend_from_slice(&directory);
        out.extend_from_slice(&body);
        FontFile::load(out).expect("test font must be well-formed")
    }

    #[test]
    fn simple_ascii_text_shapes_one_glyph_per_char() {
        let font = build_test_font();
        let buf = shape(b"ab", &font, 12.0, FeatureSet::empty(), Some(false)).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.glyph_infos[0].cluster, 0);
        assert_eq!(buf.glyph_infos[1].cluster, 1);
    }

    #[test]
    fn ligature_collapses_two_glyphs_into_one_with_lowest_cluster() {
        let font = build_test_font();
        let buf = shape(b"==", &font, 12.0, FeatureSet::default_features(), Some(false)).unwrap();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.glyph_infos[0].cluster, 0);
    }

    #[test]
    fn ligatures_off_keeps_two_glyphs() {
        let font = build_test_font();
        let buf = shape(b"==", &font, 12.0, FeatureSet::empty() | FeatureSet::KERN, Some(false)).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.glyph_infos[0].cluster, 0);
        assert_eq!(buf.glyph_infos[1].cluster, 1);
    }

    #[test]
    fn invalid_utf8_does_not_abort_shaping() {
        let font = build_test_font();
        let buf = shape(&[b'a', 0xFF, b'b'], &font, 12.0, FeatureSet::empty(), Some(false)).unwrap();
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn cluster_ids_are_non_decreasing_in_storage_order_for_ltr() {
        let font = build_test_font();
        let buf = shape(b"hello", &font, 12.0, FeatureSet::empty(), Some(false)).unwrap();
        let clusters: Vec<u32> = buf.glyph_infos.iter().map(|g| g.cluster).collect();
        let mut sorted = clusters.clone();
        sorted.sort_unstable();
        assert_eq!(clusters, sorted);
    }

    #[test]
    fn scaled_advance_matches_spec_scenario_one() {
        let font = build_test_font();
        let buf = shape(b"==", &font, 12.0, FeatureSet::default_features(), Some(false)).unwrap();
        // advance('=') + advance('=') + kern(=,=) [kern table absent -> 0],
        // scaled by 12/1000.
        let expected = (600.0 + 600.0) * (12.0 / 1000.0);
        assert!((buf.positions[0].x_advance - expected).abs() < 0.001);
    }

    #[test]
    fn glyph_not_found_error_variant_is_reachable() {
        // termshape-shape never surfaces this itself (it substitutes
        // .notdef), but the variant must exist for callers that query
        // FontView::glyph_outline directly (spec §7).
        let err = Error::GlyphNotFound(42);
        assert!(matches!(err, Error::GlyphNotFound(42)));
    }
}
