use termshape_data::Result;

use crate::reader::Reader;

/// Underline metrics from the `post` table header, which is present
/// (in one format or another) in every well-formed sfnt font: spec §3
/// lists `underline_pos`/`underline_thickness` as part of `FontView`'s
/// metrics, and the `post` header is where TrueType/OpenType fonts
/// actually carry them (they are format-independent, read before any
/// of `post`'s per-glyph-name data that versions 1.0/2.0/3.0 disagree
/// on).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderlineMetrics {
    pub position: i16,
    pub thickness: i16,
}

/// Reads `underlinePosition`/`underlineThickness` at offsets 8/10 of
/// the `post` table.
pub fn underline_metrics(post: &[u8]) -> Result<UnderlineMetrics> {
    let mut r = Reader::at(post, 8);
    let position = r.i16()?;
    let thickness = r.i16()?;
    Ok(UnderlineMetrics { position, thickness })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_underline_metrics() {
        let mut data = vec![0u8; 12];
        data[8..10].copy_from_slice(&(-75i16).to_be_bytes());
        data[10..12].copy_from_slice(&50i16.to_be_bytes());
        let m = underline_metrics(&data).unwrap();
        assert_eq!(m.position, -75);
        assert_eq!(m.thickness, 50);
    }
}
