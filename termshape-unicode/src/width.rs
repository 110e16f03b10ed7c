use unicode_width::UnicodeWidthChar;

/// Selects how East-Asian-Ambiguous code points are measured, per spec
/// §4.2 ("Width policy is parameterized by an East-Asian mode").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EastAsianMode {
    /// Ambiguous-width characters measure as narrow (width 1).
    #[default]
    Standard,
    /// Ambiguous-width characters measure as wide (width 2), the
    /// common default for CJK locales / legacy terminals.
    Wide,
}

/// Terminal-column width of a single code point under the given policy.
///
/// Zero-width controls and combining marks return 0; tabs return 0 here
/// (the caller expands tab stops, which is implementation-defined per
/// spec §4.2); everything else falls back to `unicode-width`'s tables,
/// selecting the ambiguous-width interpretation from `mode`.
pub fn width(ch: char, mode: EastAsianMode) -> u8 {
    if ch == '\t' || ch == '\0' {
        return 0;
    }

    let w = match mode {
        EastAsianMode::Standard => ch.width(),
        EastAsianMode::Wide => ch.width_cjk(),
    };

    w.unwrap_or(0) as u8
}

/// Terminal-column width of a grapheme cluster: the max width of its
/// constituent scalar values (a combining mark contributes 0, the base
/// contributes its own width).
pub fn width_str(s: &str, mode: EastAsianMode) -> u8 {
    s.chars().map(|c| width(c, mode)).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_width_one() {
        assert_eq!(width('a', EastAsianMode::Standard), 1);
    }

    #[test]
    fn combining_mark_is_zero_width() {
        assert_eq!(width('\u{0301}', EastAsianMode::Standard), 0);
    }

    #[test]
    fn cjk_ideograph_is_wide_in_both_modes() {
        assert_eq!(width('中', EastAsianMode::Standard), 2);
        assert_eq!(width('中', EastAsianMode::Wide), 2);
    }

    #[test]
    fn ambiguous_width_depends_on_mode() {
        // U+00B1 PLUS-MINUS SIGN is East Asian Ambiguous.
        let standard = width('\u{00B1}', EastAsianMode::Standard);
        let wide = width('\u{00B1}', EastAsianMode::Wide);
        assert_eq!(standard, 1);
        assert_eq!(wide, 2);
    }
}
