//! Unicode-aware terminal text shaping and glyph-composition engine.
//!
//! [`TextRenderer`] is the facade: load fonts into it, then render
//! lines of text into an RGBA pixel buffer one terminal cell at a
//! time. The individual components — [`FontArena`]/[`FontFile`],
//! [`GlyphAtlas`], [`CellRenderer`], [`SymbolRenderer`],
//! [`EmojiComposer`], [`CursorModel`], [`LayoutPlanner`] — are public
//! for callers that need to drive the pipeline more directly (e.g. a
//! GPU-backed renderer that uploads atlas rectangles itself).

pub mod atlas;
pub mod cell;
pub mod config;
pub mod cursor;
pub mod emoji;
pub mod fonts;
pub mod layout;
mod raster;
pub mod symbol;
mod text_renderer;

pub use atlas::GlyphAtlas;
pub use cell::{AlignmentPolicy, CellRenderer};
pub use config::{Config, CursorShape, ZeroStyle};
pub use cursor::{CursorModel, CursorState, ShapingAnalysis};
pub use emoji::{ComponentTile, EmojiComposer, EmojiSequenceKind};
pub use fonts::{FontArena, FontId};
pub use layout::{Complexity, LayoutPlanner, LineSegment};
pub use symbol::SymbolRenderer;
pub use termshape_data::{CellEffects, Error, FontStyle, Result, Rgba8, SizeQ};
pub use text_renderer::TextRenderer;
use termshape_unicode::EmojiProperty;

/// Checks if a grapheme is an emoji-presentation-by-default character.
///
/// A text-presentation-by-default symbol (e.g. arrows, card suits)
/// only counts as emoji when explicitly followed by the emoji
/// variation selector `\u{FE0F}`; without it, it's a regular text
/// glyph (spec §4.2's `emoji_property`, UTR #51 §2.3).
pub fn is_emoji(s: &str) -> bool {
    let Some(first) = s.chars().next() else { return false };
    match termshape_unicode::emoji_property(first) {
        EmojiProperty::Presentation | EmojiProperty::Zwj | EmojiProperty::Modifier | EmojiProperty::Tag => true,
        EmojiProperty::Emoji => s.contains('\u{FE0F}'),
        EmojiProperty::Component | EmojiProperty::None => false,
    }
}

/// Checks if a grapheme is double-width (emoji or fullwidth
/// character), per spec §4.2's East-Asian-width rules plus the emoji
/// exception terminals apply universally.
pub fn is_double_width(grapheme: &str) -> bool {
    grapheme.chars().next().is_some_and(|ch| is_emoji(grapheme) || termshape_unicode::width(ch) == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoji_presentation_default_is_always_emoji() {
        assert!(is_emoji("\u{1F680}"));
        assert!(is_emoji("\u{1F600}"));
    }

    #[test]
    fn text_presentation_default_needs_variation_selector() {
        assert!(!is_emoji("\u{25B6}"));
        assert!(is_emoji("\u{25B6}\u{FE0F}"));
    }

    #[test]
    fn ascii_is_not_emoji() {
        assert!(!is_emoji("A"));
    }

    #[test]
    fn zwj_sequences_are_double_width() {
        assert!(is_double_width("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}"));
    }

    #[test]
    fn cjk_is_double_width() {
        assert!(is_double_width("\u{4E2D}"));
        assert!(is_double_width("\u{65E5}"));
    }

    #[test]
    fn ascii_is_single_width() {
        assert!(!is_double_width("A"));
        assert!(!is_double_width("\u{2192}"));
    }
}
