use termshape_data::Result;

use crate::reader::Reader;

/// Units-per-em, read from byte offset 18 of the `head` table (spec
/// §4.1: "reads a big-endian u16 from the `head` table at offset 18").
pub fn units_per_em(head: &[u8]) -> Result<u16> {
    let mut r = Reader::at(head, 18);
    r.u16()
}

/// `indexToLocFormat` at offset 50: `0` for Offset16, nonzero for
/// Offset32, selecting how `loca` entries are widened.
pub fn index_to_loc_format(head: &[u8]) -> Result<i16> {
    let mut r = Reader::at(head, 50);
    r.i16()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_head() -> Vec<u8> {
        let mut data = vec![0u8; 54];
        data[18..20].copy_from_slice(&2048u16.to_be_bytes());
        data[50..52].copy_from_slice(&1i16.to_be_bytes());
        data
    }

    #[test]
    fn reads_units_per_em() {
        assert_eq!(units_per_em(&sample_head()).unwrap(), 2048);
    }

    #[test]
    fn reads_loca_format() {
        assert_eq!(index_to_loc_format(&sample_head()).unwrap(), 1);
    }
}
