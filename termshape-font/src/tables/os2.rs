use termshape_data::Result;

use crate::reader::Reader;

/// Strikethrough metrics from the `OS/2` table, per spec §3's
/// `FontView` metrics (`strikethrough_pos`/`strikethrough_thickness`).
/// OpenType has no dedicated strikeout fields in `post`/`hhea`; `OS/2`
/// is where every variant of the format carries them
/// (`yStrikeoutPosition`/`yStrikeoutSize` at a fixed offset present
/// since the table's version 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeoutMetrics {
    pub position: i16,
    pub size: i16,
}

/// Reads `yStrikeoutPosition`/`yStrikeoutSize` at offsets 26/28 of
/// `OS/2`.
pub fn strikeout_metrics(os2: &[u8]) -> Result<StrikeoutMetrics> {
    let mut r = Reader::at(os2, 26);
    let position = r.i16()?;
    let size = r.i16()?;
    Ok(StrikeoutMetrics { position, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_strikeout_metrics() {
        let mut data = vec![0u8; 30];
        data[26..28].copy_from_slice(&300i16.to_be_bytes());
        data[28..30].copy_from_slice(&80i16.to_be_bytes());
        let m = strikeout_metrics(&data).unwrap();
        assert_eq!(m.position, 300);
        assert_eq!(m.size, 80);
    }
}
