//! Unicode property oracle for the termshape pipeline.
//!
//! Bundles the lookups the shaper, layout planner, and cursor model
//! need: script, BiDi class, Arabic joining type, East Asian width,
//! an approximate general category, and grapheme/word boundary
//! iterators. Each concern lives in its own module; [`UnicodeOracle`]
//! is a zero-sized facade that forwards to them so callers can depend
//! on a single type if they don't want the module paths.

mod bidi;
mod emoji;
mod general_category;
mod grapheme;
mod joining;
mod script;
mod width;
mod word;

pub use bidi::{bidi_class, resolve, BidiAnalysis, BidiClass, BidiRun};
pub use emoji::{
    emoji_property, is_emoji_variation_selector, is_regional_indicator, is_text_variation_selector,
    EmojiProperty,
};
pub use general_category::{general_category, GeneralCategory};
pub use grapheme::{graphemes, is_flag_sequence, GraphemeSpan};
pub use joining::{joining_type, JoiningType};
pub use script::{is_run_terminating, script, Script};
pub use width::{width, width_str, EastAsianMode};
pub use word::{words, WordClass, WordSpan};

/// Stateless facade bundling the property lookups above behind one
/// type, for callers that want `oracle.script(ch)` rather than
/// `termshape_unicode::script(ch)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeOracle {
    east_asian_mode: EastAsianMode,
}

impl UnicodeOracle {
    /// Creates an oracle with the given East-Asian-width policy.
    pub fn new(east_asian_mode: EastAsianMode) -> Self {
        Self { east_asian_mode }
    }

    pub fn script(&self, ch: char) -> Script {
        script(ch)
    }

    pub fn bidi_class(&self, ch: char) -> BidiClass {
        bidi_class(ch)
    }

    pub fn resolve_bidi(&self, text: &str, base_direction: Option<bool>) -> BidiAnalysis {
        resolve(text, base_direction)
    }

    pub fn joining_type(&self, ch: char) -> JoiningType {
        joining_type(ch)
    }

    pub fn width(&self, ch: char) -> u8 {
        width(ch, self.east_asian_mode)
    }

    pub fn width_str(&self, s: &str) -> u8 {
        width_str(s, self.east_asian_mode)
    }

    pub fn general_category(&self, ch: char) -> GeneralCategory {
        general_category(ch)
    }

    pub fn emoji_property(&self, ch: char) -> EmojiProperty {
        emoji_property(ch)
    }

    pub fn graphemes<'t>(&self, text: &'t str) -> Vec<GraphemeSpan> {
        graphemes(text)
    }

    pub fn words<'t>(&self, text: &'t str) -> Vec<WordSpan> {
        words(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_reports_width_under_its_configured_mode() {
        let standard = UnicodeOracle::new(EastAsianMode::Standard);
        let wide = UnicodeOracle::new(EastAsianMode::Wide);
        assert_eq!(standard.width('\u{00B1}'), 1);
        assert_eq!(wide.width('\u{00B1}'), 2);
    }

    #[test]
    fn oracle_segments_graphemes() {
        let oracle = UnicodeOracle::default();
        assert_eq!(oracle.graphemes("ab").len(), 2);
    }
}
