//! A hand-rolled, bounds-checked sfnt (TrueType/OpenType) container
//! reader.
//!
//! [`FontFile`] validates the offset header and table directory once
//! at `load` time, then exposes table lookups, glyph-index resolution,
//! outline decoding, and classic kerning as cheap, side-effect-free
//! queries over the original byte buffer. No table is copied out; the
//! font's bytes are the only allocation this crate holds onto.

mod directory;
mod reader;
pub mod tables;

use termshape_data::{Error, Result};

use directory::Directory;
use tables::hhea::Metrics;
use tables::glyf::Outline;

const TAG_HEAD: [u8; 4] = *b"head";
const TAG_HHEA: [u8; 4] = *b"hhea";
const TAG_HMTX: [u8; 4] = *b"hmtx";
const TAG_CMAP: [u8; 4] = *b"cmap";
const TAG_GLYF: [u8; 4] = *b"glyf";
const TAG_LOCA: [u8; 4] = *b"loca";
const TAG_KERN: [u8; 4] = *b"kern";
const TAG_NAME: [u8; 4] = *b"name";
const TAG_POST: [u8; 4] = *b"post";
const TAG_OS2: [u8; 4] = *b"OS/2";

/// A loaded, validated sfnt font file.
///
/// Construction (`load`) is the only fallible, non-trivial operation;
/// every accessor after that either succeeds or returns a typed error
/// describing which required table was missing or malformed.
pub struct FontFile {
    data: Vec<u8>,
    directory: Directory,
}

impl FontFile {
    /// Validates the 12-byte offset header and table directory, per
    /// spec §4.1. Fails with [`Error::InvalidFontData`] if any table's
    /// offset/length runs past the end of `bytes`, or
    /// [`Error::UnsupportedFormat`] if the sfnt magic isn't recognized.
    pub fn load(bytes: Vec<u8>) -> Result<Self> {
        let directory = Directory::parse(&bytes)?;
        Ok(Self { data: bytes, directory })
    }

    /// Returns the `(offset, length)` of the table named `tag`, if the
    /// font has one.
    pub fn table(&self, tag: &[u8; 4]) -> Option<(u32, u32)> {
        self.directory.find(tag).map(|r| (r.offset, r.length))
    }

    fn require_table(&self, tag: &[u8; 4], name: &str) -> Result<&[u8]> {
        self.directory
            .slice(&self.data, tag)
            .ok_or_else(|| Error::invalid_font_data(format!("missing required table '{name}'")))
    }

    /// The font's design units per em, from `head`.
    pub fn units_per_em(&self) -> Result<u16> {
        let head = self.require_table(&TAG_HEAD, "head")?;
        tables::head::units_per_em(head)
    }

    /// Font-wide ascent/descent/line_gap/line_height (from `hhea`,
    /// required) plus underline/strikethrough metrics (from the
    /// optional `post`/`OS/2` tables, 0 if absent), per spec §3.
    pub fn metrics(&self) -> Result<Metrics> {
        let hhea = self.require_table(&TAG_HHEA, "hhea")?;
        let mut m = tables::hhea::metrics(hhea)?;

        if let Some(post) = self.directory.slice(&self.data, &TAG_POST) {
            if let Ok(u) = tables::post::underline_metrics(post) {
                m.underline_pos = u.position;
                m.underline_thickness = u.thickness;
            }
        }
        if let Some(os2) = self.directory.slice(&self.data, &TAG_OS2) {
            if let Ok(s) = tables::os2::strikeout_metrics(os2) {
                m.strikethrough_pos = s.position;
                m.strikethrough_thickness = s.size;
            }
        }

        Ok(m)
    }

    /// Maps a Unicode code point to a glyph id via `cmap`. Unknown
    /// code points return 0 (`.notdef`), never an error.
    pub fn glyph_index(&self, cp: u32) -> Result<u16> {
        let cmap = self.require_table(&TAG_CMAP, "cmap")?;
        let subtable = tables::cmap::select_subtable(cmap)?;
        subtable.glyph_index(cp)
    }

    /// The horizontal advance width and left side bearing for
    /// `glyph_id`, from `hmtx`/`hhea`.
    pub fn horizontal_metric(&self, glyph_id: u16) -> Result<tables::hmtx::HorizontalMetric> {
        let hhea = self.require_table(&TAG_HHEA, "hhea")?;
        let num_h_metrics = tables::hhea::number_of_h_metrics(hhea)?;
        let hmtx = self.require_table(&TAG_HMTX, "hmtx")?;
        tables::hmtx::metric_for(hmtx, num_h_metrics, glyph_id)
    }

    /// Decodes `glyph_id`'s outline from `glyf`/`loca`, resolving
    /// composite glyphs recursively with their 2x2 transforms applied.
    pub fn glyph_outline(&self, glyph_id: u16) -> Result<Outline> {
        let head = self.require_table(&TAG_HEAD, "head")?;
        let loca_short = tables::head::index_to_loc_format(head)? == 0;
        let loca_table = self.require_table(&TAG_LOCA, "loca")?;
        let glyf = self.require_table(&TAG_GLYF, "glyf")?;
        tables::glyf::outline(glyf, loca_table, loca_short, glyph_id)
    }

    /// Classic `kern` table lookup; returns 0 when the pair is absent
    /// or the font has no `kern` table at all.
    pub fn kerning(&self, left: u16, right: u16) -> Result<i16> {
        match self.directory.slice(&self.data, &TAG_KERN) {
            Some(kern) => tables::kern::kerning(kern, left, right),
            None => Ok(0),
        }
    }

    /// The font's family name, from `name` (nameID 1), if present.
    pub fn family_name(&self) -> Result<Option<String>> {
        match self.directory.slice(&self.data, &TAG_NAME) {
            Some(name) => tables::name::family_name(name),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_font_with_head(units_per_em: u16) -> Vec<u8> {
        let mut head = vec![0u8; 54];
        head[18..20].copy_from_slice(&units_per_em.to_be_bytes());

        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        let offset = 12 + 16;
        out.extend_from_slice(b"head");
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(head.len() as u32).to_be_bytes());
        out.extend_from_slice(&head);
        out
    }

    #[test]
    fn loads_valid_header_and_reads_units_per_em() {
        let font = FontFile::load(build_font_with_head(1000)).unwrap();
        assert_eq!(font.units_per_em().unwrap(), 1000);
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = vec![0u8; 16];
        assert!(FontFile::load(bytes).is_err());
    }

    fn build_font(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        let header_len = 12 + tables.len() * 16;
        let mut offset = header_len;
        let mut directory = Vec::new();
        let mut body = Vec::new();
        for (tag, data) in tables {
            directory.extend_from_slice(tag);
            directory.extend_from_slice(&0u32.to_be_bytes());
            directory.extend_from_slice(&(offset as u32).to_be_bytes());
            directory.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(data);
            offset += data.len();
        }

        out.extend_from_slice(&directory);
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn metrics_picks_up_underline_and_strikethrough_from_optional_tables() {
        let mut hhea = vec![0u8; 36];
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());

        let mut post = vec![0u8; 12];
        post[8..10].copy_from_slice(&(-100i16).to_be_bytes());
        post[10..12].copy_from_slice(&50i16.to_be_bytes());

        let mut os2 = vec![0u8; 30];
        os2[26..28].copy_from_slice(&300i16.to_be_bytes());
        os2[28..30].copy_from_slice(&60i16.to_be_bytes());

        let bytes = build_font(&[(*b"hhea", hhea), (*b"post", post), (*b"OS/2", os2)]);
        let font = FontFile::load(bytes).unwrap();
        let m = font.metrics().unwrap();
        assert_eq!(m.underline_pos, -100);
        assert_eq!(m.underline_thickness, 50);
        assert_eq!(m.strikethrough_pos, 300);
        assert_eq!(m.strikethrough_thickness, 60);
    }

    #[test]
    fn metrics_defaults_underline_and_strikethrough_when_tables_absent() {
        let mut hhea = vec![0u8; 36];
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        let bytes = build_font(&[(*b"hhea", hhea)]);
        let font = FontFile::load(bytes).unwrap();
        let m = font.metrics().unwrap();
        assert_eq!(m.underline_pos, 0);
        assert_eq!(m.strikethrough_thickness, 0);
    }

    #[test]
    fn missing_table_is_invalid_font_data() {
        let font = FontFile::load(build_font_with_head(1000)).unwrap();
        assert!(font.metrics().is_err());
    }

    #[test]
    fn kerning_without_kern_table_is_zero() {
        let font = FontFile::load(build_font_with_head(1000)).unwrap();
        assert_eq!(font.kerning(1, 2).unwrap(), 0);
    }
}
