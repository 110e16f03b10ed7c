use termshape_data::Result;

use crate::reader::Reader;

/// Looks up the `(start, end)` byte range of glyph `glyph_id`'s data
/// within `glyf`, per the `loca` table. `short` selects Offset16
/// (values are halved) vs Offset32 encoding (spec §4.1, `head`'s
/// `indexToLocFormat`).
///
/// An empty range (`start == end`) means the glyph has no outline
/// (e.g. the space character).
pub fn glyph_range(loca: &[u8], short: bool, glyph_id: u16) -> Result<(u32, u32)> {
    if short {
        let mut r = Reader::at(loca, glyph_id as usize * 2);
        let start = r.u16()? as u32 * 2;
        let end = r.u16()? as u32 * 2;
        Ok((start, end))
    } else {
        let mut r = Reader::at(loca, glyph_id as usize * 4);
        let start = r.u32()?;
        let end = r.u32()?;
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_format_doubles_offsets() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&50u16.to_be_bytes());
        let (start, end) = glyph_range(&data, true, 0).unwrap();
        assert_eq!((start, end), (0, 100));
    }

    #[test]
    fn long_format_reads_raw_offsets() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&120u32.to_be_bytes());
        let (start, end) = glyph_range(&data, false, 0).unwrap();
        assert_eq!((start, end), (0, 120));
    }
}
