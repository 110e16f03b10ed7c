/// Error categories shared by the font decoder, shaper, atlas, and renderer.
///
/// These are kinds, not one-exception-per-site types: decode failures are
/// surfaced to the caller, while cache/atlas pressure is recoverable and
/// handled by the caller at the next idle point (see termshape-core).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The sfnt header, table directory, or a required table was out of
    /// bounds, truncated, or otherwise malformed.
    #[error("invalid font data: {0}")]
    InvalidFontData(String),

    /// The sfnt magic or a cmap subtable format isn't one this decoder
    /// implements.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The caller asked for a glyph id that isn't present in the font.
    /// The shaper never surfaces this itself (it substitutes `.notdef`);
    /// callers that query `FontView::glyph_outline` directly may see it.
    #[error("glyph not found: {0}")]
    GlyphNotFound(u32),

    /// The glyph atlas could not make room for a rectangle even after
    /// evicting every reclaimable entry.
    #[error("atlas full: requested {requested_w}x{requested_h}")]
    AtlasFull {
        /// Requested rectangle width in pixels.
        requested_w: u32,
        /// Requested rectangle height in pixels.
        requested_h: u32,
    },

    /// The allocator refused a request (bitmap, texture, or cache buffer).
    #[error("memory error: {0}")]
    MemoryError(String),
}

impl Error {
    /// Builds an [`Error::InvalidFontData`] with the given detail message.
    pub fn invalid_font_data(detail: impl Into<String>) -> Self {
        Self::InvalidFontData(detail.into())
    }

    /// Builds an [`Error::UnsupportedFormat`] with the given detail message.
    pub fn unsupported_format(detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat(detail.into())
    }

    /// Builds an [`Error::AtlasFull`] for a rectangle of the given size.
    pub fn atlas_full(requested_w: u32, requested_h: u32) -> Self {
        Self::AtlasFull { requested_w, requested_h }
    }

    /// Builds a [`Error::MemoryError`] with the given detail message.
    pub fn memory_error(detail: impl Into<String>) -> Self {
        Self::MemoryError(detail.into())
    }
}

/// Convenience alias used throughout the termshape crates.
pub type Result<T> = std::result::Result<T, Error>;
