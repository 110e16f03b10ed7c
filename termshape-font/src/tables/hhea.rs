use termshape_data::Result;

use crate::reader::Reader;

/// Font-wide metrics, per spec §3's `FontView` ("horizontal metrics
/// `{ascent, descent, line_gap, underline_pos, underline_thickness,
/// strikethrough_pos, strikethrough_thickness}` in font units").
///
/// `ascent`/`descent`/`line_gap`/`line_height` come from `hhea` (spec
/// §4.1); `underline_*`/`strikethrough_*` default to 0 here and are
/// filled in by [`crate::FontFile::metrics`] from `post`/`OS/2` when
/// those optional tables are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    pub ascent: i16,
    pub descent: i16,
    pub line_gap: i16,
    pub line_height: i16,
    pub underline_pos: i16,
    pub underline_thickness: i16,
    pub strikethrough_pos: i16,
    pub strikethrough_thickness: i16,
}

/// Reads ascent/descent/line_gap from `hhea` at offsets 4/6/8 and
/// derives `line_height = ascent - descent + line_gap`. The
/// underline/strikethrough fields are left at 0; callers fill them in
/// from `post`/`OS/2` separately.
pub fn metrics(hhea: &[u8]) -> Result<Metrics> {
    let mut r = Reader::at(hhea, 4);
    let ascent = r.i16()?;
    let descent = r.i16()?;
    let line_gap = r.i16()?;
    Ok(Metrics {
        ascent,
        descent,
        line_gap,
        line_height: ascent - descent + line_gap,
        ..Metrics::default()
    })
}

/// `numberOfHMetrics` at offset 34, needed to size the `hmtx` array.
pub fn number_of_h_metrics(hhea: &[u8]) -> Result<u16> {
    let mut r = Reader::at(hhea, 34);
    r.u16()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hhea(num_h_metrics: u16) -> Vec<u8> {
        let mut data = vec![0u8; 36];
        data[4..6].copy_from_slice(&1820i16.to_be_bytes());
        data[6..8].copy_from_slice(&(-430i16).to_be_bytes());
        data[8..10].copy_from_slice(&0i16.to_be_bytes());
        data[34..36].copy_from_slice(&num_h_metrics.to_be_bytes());
        data
    }

    #[test]
    fn computes_line_height() {
        let m = metrics(&sample_hhea(4)).unwrap();
        assert_eq!(m.ascent, 1820);
        assert_eq!(m.descent, -430);
        assert_eq!(m.line_height, 2250);
    }

    #[test]
    fn reads_num_h_metrics() {
        assert_eq!(number_of_h_metrics(&sample_hhea(7)).unwrap(), 7);
    }
}
