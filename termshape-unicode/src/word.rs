use unicode_segmentation::UnicodeSegmentation;

/// Coarse word classification used by the cursor model's `word_left`
/// / `word_right` motions (spec §4.8): distinguishes "word" runs from
/// "whitespace" runs from "punctuation" runs so that caret motion stops
/// at the same boundaries a terminal user expects from shell line
/// editing, rather than only at UAX #29 word boundaries (which treat a
/// run of punctuation as its own non-word segment already, but don't
/// label it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Word,
    Whitespace,
    Punctuation,
    Other,
}

/// A single UAX #29 word-boundary segment with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub len: usize,
    pub class: WordClass,
}

impl WordSpan {
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.start + self.len]
    }
}

/// Splits `text` into word-boundary segments (UAX #29) classified for
/// cursor-motion purposes.
pub fn words(text: &str) -> Vec<WordSpan> {
    text.split_word_bound_indices()
        .map(|(start, s)| WordSpan {
            start,
            len: s.len(),
            class: classify(s),
        })
        .collect()
}

fn classify(segment: &str) -> WordClass {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return WordClass::Other;
    };

    if first.is_whitespace() {
        return WordClass::Whitespace;
    }
    if first.is_alphanumeric() || first == '_' {
        return WordClass::Word;
    }
    if first.is_ascii_punctuation() || crate::general_category::general_category(first)
        == crate::general_category::GeneralCategory::Punctuation
    {
        return WordClass::Punctuation;
    }

    WordClass::Other
}
