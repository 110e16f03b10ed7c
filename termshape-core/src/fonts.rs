//! An arena of loaded fonts addressed by integer handle, per spec §9:
//! "model this as an arena of `Font` owned by the manager plus integer
//! handles... fallback chains and caches store handles, never
//! pointers."

use termshape_data::Result;
use termshape_font::FontFile;

/// An index into a [`FontArena`]. Cheap to copy, store in cache keys,
/// and pass across threads; never a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u32);

/// Owns every loaded [`FontFile`] for a [`crate::TextRenderer`]
/// instance. Fonts are appended, never removed mid-session — a font
/// that should no longer be used is simply not referenced by new
/// `FontId`s, avoiding use-after-free entirely by construction (spec
/// §9's arena-plus-handle model).
#[derive(Default)]
pub struct FontArena {
    fonts: Vec<FontFile>,
}

impl FontArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and loads `bytes` as an sfnt font, returning a handle
    /// stable for the arena's lifetime.
    ///
    /// # Errors
    /// Returns [`termshape_data::Error::InvalidFontData`] or
    /// [`termshape_data::Error::UnsupportedFormat`] per spec §4.1.
    pub fn load(&mut self, bytes: Vec<u8>) -> Result<FontId> {
        let font = FontFile::load(bytes)?;
        let family = font.family_name().ok().flatten();
        let id = FontId(self.fonts.len() as u32);
        self.fonts.push(font);
        log::debug!("loaded font {} (family {family:?})", id.0);
        Ok(id)
    }

    /// Looks up a previously loaded font by handle.
    pub fn get(&self, id: FontId) -> Option<&FontFile> {
        self.fonts.get(id.0 as usize)
    }

    /// Number of fonts currently held.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
