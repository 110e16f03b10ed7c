use bitflags::bitflags;

/// The four style variants a font file may provide distinct outlines or
/// metrics for.
///
/// Mirrors the glyph-id style bits used by terminal glyph atlases in the
/// wild (bold/italic occupy adjacent bit positions so a style can be
/// tested with a mask rather than a match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright, regular weight.
    Normal,
    /// Bold weight, upright.
    Bold,
    /// Regular weight, italic/oblique.
    Italic,
    /// Bold weight, italic/oblique.
    BoldItalic,
}

impl FontStyle {
    /// All four style variants, in a stable order.
    pub const ALL: [FontStyle; 4] =
        [FontStyle::Normal, FontStyle::Bold, FontStyle::Italic, FontStyle::BoldItalic];

    /// Whether this style carries the bold bit.
    pub const fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    /// Whether this style carries the italic bit.
    pub const fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

bitflags! {
    /// Per-cell decorations and effects applied after the glyph is
    /// rasterized, per spec §4.5.
    ///
    /// `REVERSE` and `DIM` affect compositing of fg/bg; the rest are
    /// drawn as separate strokes on top of the glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellEffects: u16 {
        /// Draw a line at `baseline + underline_pos`.
        const UNDERLINE     = 0b0000_0001;
        /// Draw a line at `strikethrough_pos`.
        const STRIKETHROUGH = 0b0000_0010;
        /// Draw a line at pixel row 2 from the top of the cell (see
        /// spec §9: chosen over `baseline - cap_height` deliberately).
        const OVERLINE      = 0b0000_0100;
        /// Swap fg/bg before compositing.
        const REVERSE       = 0b0000_1000;
        /// Multiply fg alpha by 0.5.
        const DIM           = 0b0001_0000;
        /// Render background only; glyph is not drawn.
        const INVISIBLE     = 0b0010_0000;
        /// Reported to the caller; this crate does not animate it.
        const BLINK         = 0b0100_0000;
    }
}

/// A glyph-presentation classification used by [`crate::GlyphEffect`]-style
/// callers to pick a rasterization path. Distinct from [`CellEffects`],
/// which describes post-processing rather than glyph identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    /// An ordinary font-backed glyph.
    Text,
    /// A terminal-specific vector symbol (Powerline separators, etc.)
    /// rendered without a font file, per spec §4.6.
    Symbol,
    /// A composed emoji sequence, per spec §4.7.
    Emoji,
}
