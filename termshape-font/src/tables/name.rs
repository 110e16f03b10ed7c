use termshape_data::Result;

use crate::reader::Reader;

const NAME_ID_FAMILY: u16 = 1;
const PLATFORM_WINDOWS: u16 = 3;

/// Reads the font's family name (`nameID` 1) from the `name` table,
/// preferring the Windows platform's UTF-16BE records since that's
/// the encoding most fonts actually ship.
pub fn family_name(name_table: &[u8]) -> Result<Option<String>> {
    let mut r = Reader::new(name_table);
    let _format = r.u16()?;
    let count = r.u16()?;
    let string_offset = r.u16()? as usize;

    for _ in 0..count {
        let platform_id = r.u16()?;
        let _encoding_id = r.u16()?;
        let _language_id = r.u16()?;
        let name_id = r.u16()?;
        let length = r.u16()? as usize;
        let offset = r.u16()? as usize;

        if name_id != NAME_ID_FAMILY || platform_id != PLATFORM_WINDOWS {
            continue;
        }

        let start = string_offset + offset;
        let end = start + length;
        if end > name_table.len() {
            continue;
        }

        let utf16_be = &name_table[start..end];
        let units: Vec<u16> = utf16_be
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();

        if let Ok(s) = String::from_utf16(&units) {
            return Ok(Some(s));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_name_table(family: &str) -> Vec<u8> {
        let utf16: Vec<u8> = family.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();

        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes()); // format
        data.extend_from_slice(&1u16.to_be_bytes()); // count
        let header_len = 6 + 12; // header + one record
        data.extend_from_slice(&(header_len as u16).to_be_bytes()); // stringOffset

        data.extend_from_slice(&PLATFORM_WINDOWS.to_be_bytes()); // platformID
        data.extend_from_slice(&1u16.to_be_bytes()); // encodingID
        data.extend_from_slice(&0x0409u16.to_be_bytes()); // languageID (en-US)
        data.extend_from_slice(&NAME_ID_FAMILY.to_be_bytes()); // nameID
        data.extend_from_slice(&(utf16.len() as u16).to_be_bytes()); // length
        data.extend_from_slice(&0u16.to_be_bytes()); // offset within string storage

        data.extend_from_slice(&utf16);
        data
    }

    #[test]
    fn reads_family_name() {
        let data = sample_name_table("Example Mono");
        assert_eq!(family_name(&data).unwrap().as_deref(), Some("Example Mono"));
    }
}
