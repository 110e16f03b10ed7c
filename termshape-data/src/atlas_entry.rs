use crate::{Rect, SizeQ};

/// Content-addressed key for a rasterized glyph in the [`GlyphAtlas`]
/// (see termshape-core), per spec §3 `AtlasEntry`.
///
/// `font_id` is an arena index (spec §9: "model this as an arena of
/// `Font` owned by the manager plus integer handles"), never a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasKey {
    /// Arena handle of the source font.
    pub font_id: u32,
    /// Glyph index within that font (0 is `.notdef`).
    pub glyph_id: u32,
    /// Quantized rasterization size.
    pub size: SizeQ,
    /// Bold/italic bits packed the way [`crate::FontStyle`] does.
    pub style_mask: u8,
}

/// Placement and metrics of a rasterized glyph inside the atlas texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasEntry {
    /// Packed rectangle in the atlas texture.
    pub rect: Rect,
    /// Horizontal bearing (left side bearing) in pixels.
    pub bearing_x: i32,
    /// Vertical bearing (distance from baseline to top) in pixels.
    pub bearing_y: i32,
    /// Horizontal advance in pixels.
    pub advance: i32,
    /// Monotonically increasing use counter for LRU reclamation.
    pub last_used: u64,
}
