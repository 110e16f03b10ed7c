/// Arabic (and Arabic-derived script) cursive joining behavior, per the
/// Unicode `ArabicShaping.txt` categories referenced in spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoiningType {
    /// Joins on both sides (most Arabic letters).
    Dual,
    /// Joins only to the preceding (logically left-of, visually
    /// right-of in RTL) character — e.g. ALEF, DAL, WAW.
    Right,
    /// Joins only to the following character. Rare outside some
    /// extended scripts; included for completeness.
    Left,
    /// Takes no part in joining and is skipped when determining a
    /// neighbor's joining context (combining marks, tatweel excluded).
    Transparent,
    /// Does not join and blocks joining across it.
    NonJoining,
}

/// Classifies `ch`'s joining type.
///
/// This implements the common subset of `ArabicShaping.txt` needed to
/// drive the contextual-form selection in spec §4.3: the small set of
/// "right-joining-only" letters (ALEF and its variants, DAL/THAL,
/// REH/ZAIN, WAW and its variants) plus the harakat/tatweel treated as
/// transparent; every other Arabic-block letter defaults to `Dual`
/// since that is the majority case.
pub fn joining_type(ch: char) -> JoiningType {
    let cp = ch as u32;

    // Combining marks (harakat, etc.) and format controls don't
    // interrupt joining context.
    if is_transparent(cp) {
        return JoiningType::Transparent;
    }

    if is_right_joining(cp) {
        return JoiningType::Right;
    }

    if is_arabic_letter(cp) {
        return JoiningType::Dual;
    }

    JoiningType::NonJoining
}

/// Letters that join only on their right side (connect to the previous
/// letter, never to the next): ALEF family, DAL/THAL, REH/ZAIN/variants,
/// WAW family, plus a handful of presentation-form sources.
fn is_right_joining(cp: u32) -> bool {
    matches!(cp,
        0x0622 | 0x0623 | 0x0624 | 0x0625 | 0x0627 // ALEF variants
        | 0x0629 // TEH MARBUTA
        | 0x062F | 0x0630 // DAL, THAL
        | 0x0631 | 0x0632 // REH, ZAIN
        | 0x0648 // WAW
        | 0x0698 // JEH
        | 0x06C0 | 0x06C3 | 0x06C4 | 0x06CD // waw/yeh final-only variants
        | 0x06D2 | 0x06D3 // YEH BARREE variants
    )
}

fn is_transparent(cp: u32) -> bool {
    matches!(cp,
        0x064B..=0x0655 // Arabic combining marks (fatha..hamza below)
        | 0x0670 // superscript alef
        | 0x06D6..=0x06DC // small high marks
        | 0x06DF..=0x06E4
        | 0x06E7..=0x06E8
        | 0x06EA..=0x06ED
        | 0x200B // zero width space
        | 0x200C // ZWNJ (explicitly non-joining, handled by caller; treated transparent for context skip only in shaping)
    )
}

fn is_arabic_letter(cp: u32) -> bool {
    matches!(cp,
        0x0620..=0x064A // Arabic block letters
        | 0x0656..=0x065F
        | 0x066E..=0x066F
        | 0x0671..=0x06D3
        | 0x06D5
        | 0x06EE..=0x06EF
        | 0x06FA..=0x06FC
        | 0x06FF
        | 0x0750..=0x077F // Arabic Supplement
        | 0x08A0..=0x08B4 // Arabic Extended-A
    )
}
