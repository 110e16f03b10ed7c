use termshape_unicode::Script;

use crate::decode::DecodedChar;

/// Per-character classification used to find syllable boundaries and
/// reorder classes, per spec §4.3.a.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndicCategory {
    Consonant,
    VowelIndependent,
    MatraPre,
    MatraAbove,
    MatraBelow,
    MatraPost,
    Halant,
    Nukta,
    Other,
}

/// Reorder class used to stable-sort non-base characters within a
/// syllable (spec §4.3.a: "pre=1, above=2, post=3, below=4, halant=5,
/// nukta=6").
fn reorder_class(cat: IndicCategory) -> u8 {
    match cat {
        IndicCategory::MatraPre => 1,
        IndicCategory::MatraAbove => 2,
        IndicCategory::MatraPost => 3,
        IndicCategory::MatraBelow => 4,
        IndicCategory::Halant => 5,
        IndicCategory::Nukta => 6,
        IndicCategory::Consonant | IndicCategory::VowelIndependent | IndicCategory::Other => 0,
    }
}

/// The Unicode block base for each Indic script this module handles.
/// Every listed block mirrors Devanagari's internal layout closely
/// enough (independent vowels, consonants, nukta, dependent vowel
/// signs, virama at the same relative offsets) that one relative-
/// offset table classifies all of them, per spec §4.3.a: "extended to
/// Bengali, Tamil, Telugu, Kannada, Malayalam".
fn block_base(script: Script) -> Option<u32> {
    match script {
        Script::Devanagari => Some(0x0900),
        Script::Bengali => Some(0x0980),
        Script::Gurmukhi => Some(0x0A00),
        Script::Gujarati => Some(0x0A80),
        Script::Oriya => Some(0x0B00),
        Script::Tamil => Some(0x0B80),
        Script::Telugu => Some(0x0C00),
        Script::Kannada => Some(0x0C80),
        Script::Malayalam => Some(0x0D00),
        _ => None,
    }
}

/// Whether `script` is one this module reorders. Runs of any other
/// script pass through [`reorder`] unchanged.
pub fn is_indic_script(script: Script) -> bool {
    block_base(script).is_some()
}

fn classify(ch: char, script: Script) -> IndicCategory {
    let Some(base) = block_base(script) else {
        return IndicCategory::Other;
    };
    let cp = ch as u32;
    if cp < base {
        return IndicCategory::Other;
    }
    let rel = cp - base;

    match rel {
        0x05..=0x14 => IndicCategory::VowelIndependent,
        0x15..=0x39 | 0x58..=0x5F => IndicCategory::Consonant,
        0x3C => IndicCategory::Nukta,
        0x3F => IndicCategory::MatraPre,
        0x3E | 0x40 | 0x4B | 0x4C => IndicCategory::MatraPost,
        0x41..=0x44 => IndicCategory::MatraBelow,
        0x45..=0x4A => IndicCategory::MatraAbove,
        0x4D => IndicCategory::Halant,
        _ => IndicCategory::Other,
    }
}

/// Reorders a single run's characters into visual/shaping syllable
/// order, per spec §4.3.a.
///
/// Syllable boundaries occur before an independent vowel and before a
/// consonant not immediately preceded by a halant. Within a syllable,
/// the base (first consonant or independent vowel) stays first; the
/// remaining characters are stable-sorted by [`reorder_class`].
///
/// Non-Indic runs (and Indic runs with no matras out of order) are
/// returned unchanged, cluster ids attached.
pub fn reorder(run: &[DecodedChar], script: Script) -> Vec<DecodedChar> {
    if !is_indic_script(script) {
        return run.to_vec();
    }

    let categories: Vec<IndicCategory> =
        run.iter().map(|dc| classify(dc.ch, script)).collect();

    let mut syllables: Vec<std::ops::Range<usize>> = Vec::new();
    let mut start = 0usize;
    for i in 1..run.len() {
        let is_boundary = match categories[i] {
            IndicCategory::VowelIndependent => true,
            IndicCategory::Consonant => categories[i - 1] != IndicCategory::Halant,
            _ => false,
        };
        if is_boundary {
            syllables.push(start..i);
            start = i;
        }
    }
    syllables.push(start..run.len());

    let mut out = Vec::with_capacity(run.len());
    for syllable in syllables {
        let slice = &run[syllable.clone()];
        let cats = &categories[syllable.clone()];

        if slice.is_empty() {
            continue;
        }

        // The base is the first consonant or independent vowel; default
        // to position 0 if neither is found (an orphaned mark sequence).
        let base_idx = cats
            .iter()
            .position(|c| matches!(c, IndicCategory::Consonant | IndicCategory::VowelIndependent))
            .unwrap_or(0);

        out.push(slice[base_idx]);

        let mut rest: Vec<(usize, &DecodedChar)> = slice
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != base_idx)
            .collect();
        rest.sort_by_key(|&(i, _)| reorder_class(cats[i]));

        out.extend(rest.into_iter().map(|(_, dc)| *dc));
    }

    out
}
