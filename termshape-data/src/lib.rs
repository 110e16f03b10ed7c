//! Shared data types and the error taxonomy for the termshape pipeline.
//!
//! This crate has no logic of its own; it exists so that
//! `termshape-font`, `termshape-shape`, and `termshape-core` can agree on
//! a common vocabulary (colors, rectangles, style bits, cache keys)
//! without depending on each other.

mod atlas_entry;
mod cell_tile;
mod error;
mod geometry;
mod raster_tile;
mod style;

pub use atlas_entry::{AtlasEntry, AtlasKey};
pub use cell_tile::{CellKey, CellTile};
pub use error::{Error, Result};
pub use geometry::{Rect, Rgba8, SizeQ};
pub use raster_tile::RasterTile;
pub use style::{CellEffects, FontStyle, GlyphKind};
