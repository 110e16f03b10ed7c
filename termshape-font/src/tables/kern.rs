use termshape_data::Result;

use crate::reader::Reader;

/// Looks up the kerning adjustment between glyphs `left` and `right`
/// in the classic `kern` table, format 0 (ordered pair list, binary
/// searchable). Returns 0 when the pair is absent or the table uses a
/// format this decoder doesn't implement, per spec §4.1.
pub fn kerning(kern: &[u8], left: u16, right: u16) -> Result<i16> {
    let mut r = Reader::new(kern);
    let _version = r.u16()?;
    let num_tables = r.u16()?;

    let mut offset = 4usize;
    for _ in 0..num_tables {
        let mut sub = Reader::at(kern, offset);
        let _sub_version = sub.u16()?;
        let sub_length = sub.u16()?;
        let coverage = sub.u16()?;

        let format = coverage >> 8;
        if format == 0 {
            if let Some(value) = search_format0(kern, offset + 6, left, right)? {
                return Ok(value);
            }
        }

        offset += sub_length as usize;
        if sub_length == 0 {
            break;
        }
    }

    Ok(0)
}

fn search_format0(kern: &[u8], offset: usize, left: u16, right: u16) -> Result<Option<i16>> {
    let mut r = Reader::at(kern, offset);
    let num_pairs = r.u16()?;
    r.skip(6)?; // searchRange, entrySelector, rangeShift

    let pairs_offset = offset + 8;
    for i in 0..num_pairs {
        let mut pair = Reader::at(kern, pairs_offset + i as usize * 6);
        let pair_left = pair.u16()?;
        let pair_right = pair.u16()?;
        if pair_left == left && pair_right == right {
            return Ok(Some(pair.i16()?));
        }
    }

    Ok(None)
}
