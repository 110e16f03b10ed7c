use termshape_unicode::{joining_type, JoiningType};

use crate::decode::DecodedChar;

/// The presentation-form code points a base Arabic letter may map to,
/// per spec §4.3 step 5's `init, medi, fina, isol` feature group.
///
/// Not every letter has all four: right-joining-only letters (alef,
/// dal, waw, ...) have no `initial`/`medial` form because they never
/// connect to a following letter.
struct ArabicForms {
    base: u32,
    isolated: u32,
    final_: Option<u32>,
    initial: Option<u32>,
    medial: Option<u32>,
}

/// Arabic Presentation Forms-B entries for the common Arabic letters.
/// Scoped to the letters a terminal is likely to render; this is not a
/// bug-for-bug replica of any shaping engine's full Arabic table (spec
/// §1 non-goals).
const FORMS: &[ArabicForms] = &[
    ArabicForms { base: 0x0627, isolated: 0xFE8D, final_: Some(0xFE8E), initial: None, medial: None }, // ALEF
    ArabicForms { base: 0x0628, isolated: 0xFE8F, final_: Some(0xFE90), initial: Some(0xFE91), medial: Some(0xFE92) }, // BEH
    ArabicForms { base: 0x062A, isolated: 0xFE95, final_: Some(0xFE96), initial: Some(0xFE97), medial: Some(0xFE98) }, // TEH
    ArabicForms { base: 0x062B, isolated: 0xFE99, final_: Some(0xFE9A), initial: Some(0xFE9B), medial: Some(0xFE9C) }, // THEH
    ArabicForms { base: 0x062C, isolated: 0xFE9D, final_: Some(0xFE9E), initial: Some(0xFE9F), medial: Some(0xFEA0) }, // JEEM
    ArabicForms { base: 0x062D, isolated: 0xFEA1, final_: Some(0xFEA2), initial: Some(0xFEA3), medial: Some(0xFEA4) }, // HAH
    ArabicForms { base: 0x062E, isolated: 0xFEA5, final_: Some(0xFEA6), initial: Some(0xFEA7), medial: Some(0xFEA8) }, // KHAH
    ArabicForms { base: 0x062F, isolated: 0xFEA9, final_: Some(0xFEAA), initial: None, medial: None }, // DAL
    ArabicForms { base: 0x0630, isolated: 0xFEAB, final_: Some(0xFEAC), initial: None, medial: None }, // THAL
    ArabicForms { base: 0x0631, isolated: 0xFEAD, final_: Some(0xFEAE), initial: None, medial: None }, // REH
    ArabicForms { base: 0x0632, isolated: 0xFEAF, final_: Some(0xFEB0), initial: None, medial: None }, // ZAIN
    ArabicForms { base: 0x0633, isolated: 0xFEB1, final_: Some(0xFEB2), initial: Some(0xFEB3), medial: Some(0xFEB4) }, // SEEN
    ArabicForms { base: 0x0634, isolated: 0xFEB5, final_: Some(0xFEB6), initial: Some(0xFEB7), medial: Some(0xFEB8) }, // SHEEN
    ArabicForms { base: 0x0635, isolated: 0xFEB9, final_: Some(0xFEBA), initial: Some(0xFEBB), medial: Some(0xFEBC) }, // SAD
    ArabicForms { base: 0x0636, isolated: 0xFEBD, final_: Some(0xFEBE), initial: Some(0xFEBF), medial: Some(0xFEC0) }, // DAD
    ArabicForms { base: 0x0637, isolated: 0xFEC1, final_: Some(0xFEC2), initial: Some(0xFEC3), medial: Some(0xFEC4) }, // TAH
    ArabicForms { base: 0x0638, isolated: 0xFEC5, final_: Some(0xFEC6), initial: Some(0xFEC7), medial: Some(0xFEC8) }, // ZAH
    ArabicForms { base: 0x0639, isolated: 0xFEC9, final_: Some(0xFECA), initial: Some(0xFECB), medial: Some(0xFECC) }, // AIN
    ArabicForms { base: 0x063A, isolated: 0xFECD, final_: Some(0xFECE), initial: Some(0xFECF), medial: Some(0xFED0) }, // GHAIN
    ArabicForms { base: 0x0641, isolated: 0xFED1, final_: Some(0xFED2), initial: Some(0xFED3), medial: Some(0xFED4) }, // FEH
    ArabicForms { base: 0x0642, isolated: 0xFED5, final_: Some(0xFED6), initial: Some(0xFED7), medial: Some(0xFED8) }, // QAF
    ArabicForms { base: 0x0643, isolated: 0xFED9, final_: Some(0xFEDA), initial: Some(0xFEDB), medial: Some(0xFEDC) }, // KAF
    ArabicForms { base: 0x0644, isolated: 0xFEDD, final_: Some(0xFEDE), initial: Some(0xFEDF), medial: Some(0xFEE0) }, // LAM
    ArabicForms { base: 0x0645, isolated: 0xFEE1, final_: Some(0xFEE2), initial: Some(0xFEE3), medial: Some(0xFEE4) }, // MEEM
    ArabicForms { base: 0x0646, isolated: 0xFEE5, final_: Some(0xFEE6), initial: Some(0xFEE7), medial: Some(0xFEE8) }, // NOON
    ArabicForms { base: 0x0647, isolated: 0xFEE9, final_: Some(0xFEEA), initial: Some(0xFEEB), medial: Some(0xFEEC) }, // HEH
    ArabicForms { base: 0x0648, isolated: 0xFEED, final_: Some(0xFEEE), initial: None, medial: None }, // WAW
    ArabicForms { base: 0x0649, isolated: 0xFEEF, final_: Some(0xFEF0), initial: None, medial: None }, // ALEF MAKSURA
    ArabicForms { base: 0x064A, isolated: 0xFEF1, final_: Some(0xFEF2), initial: Some(0xFEF3), medial: Some(0xFEF4) }, // YEH
];

fn forms_for(cp: u32) -> Option<&'static ArabicForms> {
    FORMS.iter().find(|f| f.base == cp)
}

fn joins_predecessor(jt: JoiningType) -> bool {
    matches!(jt, JoiningType::Dual | JoiningType::Right)
}

fn joins_successor(jt: JoiningType) -> bool {
    matches!(jt, JoiningType::Dual | JoiningType::Left)
}

/// Resolves contextual joining forms for a run of Arabic-script
/// characters, per spec §4.3 step 5.
///
/// Returns a parallel vector of the effective code point to shape with
/// at each position: either a presentation-form code point, or the
/// original code point unchanged for non-letters and letters with no
/// entry in [`FORMS`].
pub fn resolve_forms(run: &[DecodedChar]) -> Vec<u32> {
    let mut out = Vec::with_capacity(run.len());

    for (i, dc) in run.iter().enumerate() {
        let cp = dc.ch as u32;
        let Some(forms) = forms_for(cp) else {
            out.push(cp);
            continue;
        };

        let prev = nearest_non_transparent(run, i, -1);
        let next = nearest_non_transparent(run, i, 1);

        let left_join = prev
            .map(|p| joins_successor(joining_type(p)) && joins_predecessor(joining_type(dc.ch)))
            .unwrap_or(false);
        let right_join = next
            .map(|n| joins_predecessor(joining_type(n)) && joins_successor(joining_type(dc.ch)))
            .unwrap_or(false);

        let chosen = match (left_join, right_join) {
            (true, true) => forms.medial.or(forms.final_).unwrap_or(forms.isolated),
            (false, true) => forms.initial.unwrap_or(forms.isolated),
            (true, false) => forms.final_.unwrap_or(forms.isolated),
            (false, false) => forms.isolated,
        };

        out.push(chosen);
    }

    out
}

/// Walks from `from` in direction `dir` (-1 or 1), skipping joining-
/// transparent characters (combining marks), and returns the nearest
/// non-transparent neighbor's char, if any.
fn nearest_non_transparent(run: &[DecodedChar], from: usize, dir: isize) -> Option<char> {
    let mut idx = from as isize + dir;
    while idx >= 0 && (idx as usize) < run.len() {
        let ch = run[idx as usize].ch;
        if joining_type(ch) != JoiningType::Transparent {
            return Some(ch);
        }
        idx += dir;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<DecodedChar> {
        text.char_indices()
            .map(|(i, ch)| DecodedChar { cluster: i as u32, ch })
            .collect()
    }

    #[test]
    fn isolated_letter_has_no_neighbors() {
        let r = run("\u{0628}"); // BEH alone
        let forms = resolve_forms(&r);
        assert_eq!(forms[0], 0xFE8F);
    }

    #[test]
    fn medial_letter_joins_both_sides() {
        // BEH BEH BEH: the middle one should take the medial form.
        let r = run("\u{0628}\u{0628}\u{0628}");
        let forms = resolve_forms(&r);
        assert_eq!(forms[1], 0xFE92);
    }

    #[test]
    fn right_joining_only_letter_never_gets_initial_or_medial() {
        // ALEF BEH: alef can only ever be isolated or final.
        let r = run("\u{0627}\u{0628}");
        let forms = resolve_forms(&r);
        assert!(forms[0] == 0xFE8D || forms[0] == 0xFE8E);
    }

    #[test]
    fn initial_form_when_only_right_neighbor_joins() {
        let r = run("\u{0628}\u{0628}"); // BEH BEH
        let forms = resolve_forms(&r);
        assert_eq!(forms[0], 0xFE91); // initial
        assert_eq!(forms[1], 0xFE90); // final
    }
}
