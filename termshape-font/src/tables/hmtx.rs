use termshape_data::Result;

use crate::reader::Reader;

/// Horizontal advance width and left side bearing for a single glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizontalMetric {
    pub advance_width: u16,
    pub lsb: i16,
}

/// Looks up `glyph_id`'s advance width and left side bearing in `hmtx`.
///
/// `hmtx` stores `num_h_metrics` `(advanceWidth, lsb)` pairs followed
/// by `lsb`-only entries for any remaining glyphs, all of which share
/// the last `advanceWidth` (the standard monospace-tail optimization).
pub fn metric_for(hmtx: &[u8], num_h_metrics: u16, glyph_id: u16) -> Result<HorizontalMetric> {
    let num_h_metrics = num_h_metrics.max(1);

    if glyph_id < num_h_metrics {
        let mut r = Reader::at(hmtx, glyph_id as usize * 4);
        let advance_width = r.u16()?;
        let lsb = r.i16()?;
        return Ok(HorizontalMetric { advance_width, lsb });
    }

    let last_full_offset = (num_h_metrics as usize - 1) * 4;
    let mut last = Reader::at(hmtx, last_full_offset);
    let advance_width = last.u16()?;
    let _ = last.i16()?;

    let tail_index = glyph_id - num_h_metrics;
    let lsb_offset = num_h_metrics as usize * 4 + tail_index as usize * 2;
    let mut lsb_reader = Reader::at(hmtx, lsb_offset);
    let lsb = lsb_reader.i16()?;

    Ok(HorizontalMetric { advance_width, lsb })
}
