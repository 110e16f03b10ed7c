/// One decoded source character paired with the cluster id it was
/// assigned: its byte offset in the original input (spec §4.3 step 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedChar {
    pub cluster: u32,
    pub ch: char,
}

/// Decodes `bytes` as UTF-8, assigning each resulting code point a
/// cluster id equal to its byte offset in the source.
///
/// Invalid sequences never stop shaping (spec §4.3, §6, §7): each bad
/// byte contributes one U+FFFD replacement character and the decoder
/// advances by exactly one source byte, matching "invalid UTF-8
/// contributes a U+FFFD code point and does not stop shaping".
pub fn decode_lossy(bytes: &[u8]) -> Vec<DecodedChar> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0usize;

    while pos < bytes.len() {
        match std::str::from_utf8(&bytes[pos..]) {
            Ok(valid) => {
                for (offset, ch) in valid.char_indices() {
                    out.push(DecodedChar { cluster: (pos + offset) as u32, ch });
                }
                break;
            },
            Err(err) => {
                let valid_len = err.valid_up_to();
                if valid_len > 0 {
                    let valid = std::str::from_utf8(&bytes[pos..pos + valid_len])
                        .expect("validated by from_utf8 error");
                    for (offset, ch) in valid.char_indices() {
                        out.push(DecodedChar { cluster: (pos + offset) as u32, ch });
                    }
                }

                out.push(DecodedChar {
                    cluster: (pos + valid_len) as u32,
                    ch: char::REPLACEMENT_CHARACTER,
                });

                // Advance past the whole invalid sequence if known, else one byte.
                pos += valid_len + err.error_len().unwrap_or(1);
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ascii_roundtrips() {
        let decoded = decode_lossy(b"ab");
        assert_eq!(decoded, vec![
            DecodedChar { cluster: 0, ch: 'a' },
            DecodedChar { cluster: 1, ch: 'b' },
        ]);
    }

    #[test]
    fn invalid_byte_becomes_replacement_character() {
        let decoded = decode_lossy(&[b'a', 0xFF, b'b']);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[1].ch, char::REPLACEMENT_CHARACTER);
        assert_eq!(decoded[1].cluster, 1);
        assert_eq!(decoded[2].cluster, 2);
    }

    #[test]
    fn multibyte_clusters_use_byte_offsets() {
        let decoded = decode_lossy("a\u{0627}b".as_bytes());
        assert_eq!(decoded[0].cluster, 0);
        assert_eq!(decoded[1].cluster, 1);
        // Arabic alef is 2 bytes in UTF-8.
        assert_eq!(decoded[2].cluster, 3);
    }
}
