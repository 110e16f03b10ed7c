use termshape_font::FontFile;

/// A known multi-codepoint ligature sequence and the Unicode code
/// point a font's `cmap` would map it to if it actually ships a
/// ligature glyph there.
///
/// `termshape-font`'s `FontDecoder` contract (spec §4.1, §6) only
/// reads `cmap`/`glyf`/`kern`/`name` — it never parses a real `GSUB`
/// table. So "GSUB-equivalent substitution" (spec §4.3 step 5) is
/// approximated the way many terminal emulators already do it without
/// a shaping engine: a built-in table of well-known sequences mapped
/// to the code point most ligature-carrying monospace fonts assign
/// them (Private Use Area or, for standard Latin ligatures, the
/// existing Unicode ligature code points), and the match is only
/// applied if the loaded font's `cmap` actually has a glyph there.
/// See DESIGN.md for this as a recorded Open Question resolution.
struct LigatureRule {
    sequence: &'static [char],
    codepoint: u32,
}

const RULES: &[LigatureRule] = &[
    LigatureRule { sequence: &['f', 'f', 'i'], codepoint: 0xFB03 },
    LigatureRule { sequence: &['f', 'f', 'l'], codepoint: 0xFB04 },
    LigatureRule { sequence: &['f', 'f'], codepoint: 0xFB00 },
    LigatureRule { sequence: &['f', 'i'], codepoint: 0xFB01 },
    LigatureRule { sequence: &['f', 'l'], codepoint: 0xFB02 },
    LigatureRule { sequence: &['=', '=', '='], codepoint: 0xE101 },
    LigatureRule { sequence: &['=', '='], codepoint: 0xE100 },
    LigatureRule { sequence: &['!', '='], codepoint: 0xE102 },
    LigatureRule { sequence: &['-', '>'], codepoint: 0xE103 },
    LigatureRule { sequence: &['<', '-'], codepoint: 0xE104 },
    LigatureRule { sequence: &['=', '>'], codepoint: 0xE105 },
    LigatureRule { sequence: &['<', '='], codepoint: 0xE106 },
    LigatureRule { sequence: &['>', '='], codepoint: 0xE107 },
];

const MAX_SEQUENCE_LEN: usize = 4;

/// Finds the longest ligature rule matching `chars` starting at
/// `start`, if the font actually has a glyph for its target code
/// point. Matches spec §4.3 step 5's "longest-match-wins on sequences
/// of cluster codepoints of length 2..=4".
pub fn match_at(font: &FontFile, chars: &[char], start: usize) -> Option<(usize, u16)> {
    let max_len = MAX_SEQUENCE_LEN.min(chars.len() - start);

    for len in (2..=max_len).rev() {
        let candidate = &chars[start..start + len];
        for rule in RULES {
            if rule.sequence.len() == len && rule.sequence == candidate {
                if let Ok(glyph_id) = font.glyph_index(rule.codepoint) {
                    if glyph_id != 0 {
                        return Some((len, glyph_id));
                    }
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_long_to_short_within_prefix_family() {
        // "===" must be tried before "==" so the longer match wins.
        let triple_index = RULES.iter().position(|r| r.sequence == ['=', '=', '=']).unwrap();
        let double_index = RULES.iter().position(|r| r.sequence == ['=', '=']).unwrap();
        assert!(triple_index < double_index);
    }
}
