use termshape_data::{Error, Result};

use crate::reader::Reader;

const TRUETYPE_MAGIC_1: u32 = 0x0001_0000;
const TRUETYPE_MAGIC_2: u32 = 0x7472_7565; // 'true'
const OPENTYPE_MAGIC: u32 = 0x4F54_544F; // 'OTTO'

/// A single directory entry: a 4-byte tag plus the offset/length of the
/// table's bytes within the font file.
#[derive(Debug, Clone, Copy)]
pub struct TableRecord {
    pub tag: [u8; 4],
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// The parsed sfnt offset table and its table directory.
#[derive(Debug)]
pub struct Directory {
    pub sfnt_version: u32,
    pub records: Vec<TableRecord>,
}

impl Directory {
    /// Parses the 12-byte offset header and `num_tables` 16-byte
    /// directory entries from `data`.
    ///
    /// Every offset/length is validated against `data.len()` here so
    /// later table readers don't need to re-check container bounds.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let sfnt_version = r.u32()?;

        if !matches!(sfnt_version, TRUETYPE_MAGIC_1 | TRUETYPE_MAGIC_2 | OPENTYPE_MAGIC) {
            return Err(Error::unsupported_format(format!(
                "unknown sfnt magic 0x{sfnt_version:08X}"
            )));
        }

        let num_tables = r.u16()?;
        // searchRange, entrySelector, rangeShift
        r.skip(6)?;

        let mut records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = r.tag()?;
            let checksum = r.u32()?;
            let offset = r.u32()?;
            let length = r.u32()?;

            let end = (offset as u64).saturating_add(length as u64);
            if end > data.len() as u64 {
                return Err(Error::invalid_font_data(format!(
                    "table {tag:?} offset/length out of bounds"
                )));
            }

            records.push(TableRecord { tag, checksum, offset, length });
        }

        Ok(Self { sfnt_version, records })
    }

    /// Looks up a table by its 4-byte ASCII tag (e.g. `b"head"`).
    pub fn find(&self, tag: &[u8; 4]) -> Option<&TableRecord> {
        self.records.iter().find(|r| &r.tag == tag)
    }

    /// Slices `data` to the bytes of the table named `tag`, if present.
    pub fn slice<'d>(&self, data: &'d [u8], tag: &[u8; 4]) -> Option<&'d [u8]> {
        let record = self.find(tag)?;
        Some(&data[record.offset as usize..(record.offset + record.length) as usize])
    }
}
