use termshape_data::{Error, Result};

use crate::reader::Reader;

/// A parsed `cmap` table: the chosen Unicode subtable's format and raw
/// bytes, selected up front so repeated `glyph_index` calls don't
/// re-walk the encoding record list.
pub struct CmapSubtable<'a> {
    format: u16,
    data: &'a [u8],
}

/// Picks the best Unicode subtable from `cmap`'s encoding records,
/// preferring platform=3 (Windows) encoding 10 (UCS-4) then encoding 1
/// (BMP), per spec §4.1's stated preference order, falling back to any
/// other subtable whose format this decoder understands.
pub fn select_subtable<'a>(cmap: &'a [u8]) -> Result<CmapSubtable<'a>> {
    let mut r = Reader::new(cmap);
    let _version = r.u16()?;
    let num_tables = r.u16()?;

    let mut best: Option<(u16, u16, u32)> = None; // (platform, encoding, offset)
    for _ in 0..num_tables {
        let platform_id = r.u16()?;
        let encoding_id = r.u16()?;
        let offset = r.u32()?;

        let rank = encoding_rank(platform_id, encoding_id);
        if let Some(r) = rank {
            let better = match best {
                None => true,
                Some((bp, be, _)) => r > rank_for(bp, be),
            };
            if better {
                best = Some((platform_id, encoding_id, offset));
            }
        }
    }

    let (_, _, offset) = best.ok_or_else(|| {
        Error::unsupported_format("cmap has no usable platform=3 or unicode subtable")
    })?;

    let mut sub = Reader::at(cmap, offset as usize);
    let format = sub.u16()?;
    if !matches!(format, 0 | 4 | 6 | 12) {
        return Err(Error::unsupported_format(format!("cmap subtable format {format}")));
    }

    Ok(CmapSubtable { format, data: &cmap[offset as usize..] })
}

/// Returns a preference rank (higher is better) for platform=3
/// encoding∈{1,10}, or `None` if the (platform, encoding) pair isn't
/// one this decoder will use.
fn encoding_rank(platform_id: u16, encoding_id: u16) -> Option<u8> {
    match (platform_id, encoding_id) {
        (3, 10) => Some(3),
        (3, 1) => Some(2),
        (0, _) => Some(1), // Unicode platform, any encoding
        _ => None,
    }
}

fn rank_for(platform_id: u16, encoding_id: u16) -> u8 {
    encoding_rank(platform_id, encoding_id).unwrap_or(0)
}

impl<'a> CmapSubtable<'a> {
    /// Maps a code point to a glyph id; unknown code points return 0
    /// (`.notdef`), per spec §4.1.
    pub fn glyph_index(&self, cp: u32) -> Result<u16> {
        match self.format {
            0 => self.glyph_index_format0(cp),
            4 => self.glyph_index_format4(cp),
            6 => self.glyph_index_format6(cp),
            12 => self.glyph_index_format12(cp),
            other => Err(Error::unsupported_format(format!("cmap format {other}"))),
        }
    }

    fn glyph_index_format0(&self, cp: u32) -> Result<u16> {
        if cp > 255 {
            return Ok(0);
        }
        let mut r = Reader::at(self.data, 6 + cp as usize);
        Ok(r.u8()? as u16)
    }

    fn glyph_index_format6(&self, cp: u32) -> Result<u16> {
        let mut r = Reader::at(self.data, 6);
        let first_code = r.u16()? as u32;
        let entry_count = r.u16()? as u32;

        if cp < first_code || cp >= first_code + entry_count {
            return Ok(0);
        }

        let index = cp - first_code;
        let mut g = Reader::at(self.data, 10 + index as usize * 2);
        g.u16()
    }

    /// Segment search over format 4's `endCode`/`startCode`/`idDelta`/
    /// `idRangeOffset` parallel arrays (spec §4.1: "segment search +
    /// delta / range-offset").
    fn glyph_index_format4(&self, cp: u32) -> Result<u16> {
        if cp > 0xFFFF {
            return Ok(0);
        }
        let cp = cp as u16;

        let mut r = Reader::at(self.data, 6);
        let seg_count_x2 = r.u16()?;
        let seg_count = (seg_count_x2 / 2) as usize;
        r.skip(6)?; // searchRange, entrySelector, rangeShift

        let end_codes_offset = 14;
        let start_codes_offset = end_codes_offset + seg_count * 2 + 2; // +2 for reservedPad
        let id_delta_offset = start_codes_offset + seg_count * 2;
        let id_range_offset_offset = id_delta_offset + seg_count * 2;

        let mut end_reader = Reader::at(self.data, end_codes_offset);
        let mut segment = None;
        for i in 0..seg_count {
            let end_code = end_reader.u16()?;
            if cp <= end_code {
                segment = Some(i);
                break;
            }
        }
        let Some(i) = segment else {
            return Ok(0);
        };

        let mut start_reader = Reader::at(self.data, start_codes_offset + i * 2);
        let start_code = start_reader.u16()?;
        if cp < start_code {
            return Ok(0);
        }

        let mut delta_reader = Reader::at(self.data, id_delta_offset + i * 2);
        let id_delta = delta_reader.i16()?;

        let mut range_reader = Reader::at(self.data, id_range_offset_offset + i * 2);
        let id_range_offset = range_reader.u16()?;

        if id_range_offset == 0 {
            return Ok(cp.wrapping_add(id_delta as u16));
        }

        // glyphIdArray index per the spec formula:
        // *(idRangeOffset[i]/2 + (c - startCode[i]) + &idRangeOffset[i])
        let glyph_index_addr = id_range_offset_offset
            + i * 2
            + id_range_offset as usize
            + (cp - start_code) as usize * 2;
        let mut gid_reader = Reader::at(self.data, glyph_index_addr);
        let raw_gid = gid_reader.u16()?;

        if raw_gid == 0 {
            return Ok(0);
        }
        Ok(raw_gid.wrapping_add(id_delta as u16))
    }

    fn glyph_index_format12(&self, cp: u32) -> Result<u16> {
        let mut r = Reader::at(self.data, 12);
        let num_groups = r.u32()?;

        let groups_offset = 16;
        for g in 0..num_groups {
            let mut group_reader = Reader::at(self.data, groups_offset + g as usize * 12);
            let start_char = group_reader.u32()?;
            let end_char = group_reader.u32()?;
            let start_glyph = group_reader.u32()?;

            if cp >= start_char && cp <= end_char {
                return Ok((start_glyph + (cp - start_char)) as u16);
            }
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_format4_subtable() -> Vec<u8> {
        // One segment: 'A'..'Z' (0x41..=0x5A) mapped with idDelta, plus
        // the mandatory terminating 0xFFFF segment.
        let seg_count = 2u16;
        let mut data = Vec::new();
        data.extend_from_slice(&4u16.to_be_bytes()); // format
        data.extend_from_slice(&0u16.to_be_bytes()); // length (unused by reader)
        data.extend_from_slice(&0u16.to_be_bytes()); // language
        data.extend_from_slice(&(seg_count * 2).to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes()); // searchRange
        data.extend_from_slice(&0u16.to_be_bytes()); // entrySelector
        data.extend_from_slice(&0u16.to_be_bytes()); // rangeShift

        // endCode[]
        data.extend_from_slice(&0x5Au16.to_be_bytes());
        data.extend_from_slice(&0xFFFFu16.to_be_bytes());
        // reservedPad
        data.extend_from_slice(&0u16.to_be_bytes());
        // startCode[]
        data.extend_from_slice(&0x41u16.to_be_bytes());
        data.extend_from_slice(&0xFFFFu16.to_be_bytes());
        // idDelta[]: map 'A' (0x41) -> glyph 1, so delta = 1 - 0x41
        let delta = (1i32 - 0x41i32) as i16;
        data.extend_from_slice(&delta.to_be_bytes());
        data.extend_from_slice(&1i16.to_be_bytes());
        // idRangeOffset[]
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());

        data
    }

    #[test]
    fn format4_maps_letter_in_segment() {
        let data = build_format4_subtable();
        let sub = CmapSubtable { format: 4, data: &data };
        assert_eq!(sub.glyph_index('A' as u32).unwrap(), 1);
        assert_eq!(sub.glyph_index('B' as u32).unwrap(), 2);
    }

    #[test]
    fn format4_unmapped_codepoint_is_notdef() {
        let data = build_format4_subtable();
        let sub = CmapSubtable { format: 4, data: &data };
        assert_eq!(sub.glyph_index('!' as u32).unwrap(), 0);
    }

    #[test]
    fn format0_maps_byte_codes_directly() {
        let mut data = vec![0u8; 6];
        data[0..2].copy_from_slice(&0u16.to_be_bytes());
        let mut glyph_ids = vec![0u8; 256];
        glyph_ids[65] = 7;
        data.extend_from_slice(&glyph_ids);
        let sub = CmapSubtable { format: 0, data: &data };
        assert_eq!(sub.glyph_index(65).unwrap(), 7);
    }
}
