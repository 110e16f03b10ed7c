//! Content-addressed glyph atlas: shelf packing with LRU eviction.
//!
//! Grounded in `beamterm-renderer`'s `GlyphCache`/`DynamicFontAtlas`
//! (normal/wide partitioned LRU regions, content-addressed cache keys,
//! sequential allocation with LRU eviction once a region is full), but
//! generalized to arbitrary rectangle sizes via shelf packing, per spec
//! §4.4 ("packed into a bounded 2D texture"), since termshape rasterizes
//! real font outlines instead of the teacher's fixed terminal-cell
//! slots.

use lru::LruCache;
use termshape_data::{AtlasEntry, AtlasKey, Error, Rect, Result};

/// One packed row of the atlas texture: a fixed height, filled
/// left-to-right.
struct Shelf {
    y: u32,
    height: u32,
    cursor_x: u32,
}

/// A bounded 2D rectangle packer over glyph rasterizations, keyed by
/// `(font_id, glyph_id, size, style_mask)`, per spec §3 `AtlasEntry` /
/// §4.4.
///
/// Allocation tries, in order: an exact content-addressed hit; a
/// previously-evicted free rectangle large enough to hold the request
/// (guillotine split, like `dynamic_atlas.rs`'s slot reuse); appending
/// to an existing or new shelf; then LRU eviction, one entry at a time,
/// retrying the free-rectangle list after each eviction. Fails with
/// [`Error::AtlasFull`] only once every entry has been evicted and the
/// request still doesn't fit (spec §7).
pub struct GlyphAtlas {
    width: u32,
    height: u32,
    shelves: Vec<Shelf>,
    free_rects: Vec<Rect>,
    entries: LruCache<AtlasKey, AtlasEntry>,
    tick: u64,
}

impl GlyphAtlas {
    /// Creates an atlas over a `width x height` virtual texture.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shelves: Vec::new(),
            free_rects: Vec::new(),
            entries: LruCache::unbounded(),
            tick: 0,
        }
    }

    /// Number of distinct glyphs currently packed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the atlas holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `key`, rasterizing and packing it via `metrics` on a
    /// miss. `metrics` returns `(w, h, bearing_x, bearing_y, advance)`
    /// in pixels; it's called at most once per distinct key (spec §4.4:
    /// "content-addressed keys prevent duplicate rasterization").
    ///
    /// # Errors
    /// Returns [`Error::AtlasFull`] if `(w, h)` can't be packed even
    /// after evicting every reclaimable entry.
    pub fn get_or_raster(
        &mut self,
        key: AtlasKey,
        metrics: impl FnOnce() -> (u32, u32, i32, i32, i32),
    ) -> Result<AtlasEntry> {
        self.tick += 1;

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = self.tick;
            return Ok(*entry);
        }

        let (w, h, bearing_x, bearing_y, advance) = metrics();
        let rect = self.allocate(w, h)?;
        let entry = AtlasEntry { rect, bearing_x, bearing_y, advance, last_used: self.tick };
        self.entries.put(key, entry);
        Ok(entry)
    }

    /// Drops every packed entry and resets the free list, per spec §9's
    /// "full invalidation on any font or cell-size change" resolution.
    pub fn clear(&mut self) {
        self.shelves.clear();
        self.free_rects.clear();
        self.entries.clear();
    }

    fn allocate(&mut self, w: u32, h: u32) -> Result<Rect> {
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return Err(Error::atlas_full(w, h));
        }

        if let Some(rect) = self.take_free_rect(w, h) {
            return Ok(rect);
        }
        if let Some(rect) = self.append_to_shelf(w, h) {
            return Ok(rect);
        }

        while let Some((_, evicted)) = self.entries.pop_lru() {
            self.free_rects.push(evicted.rect);
            if let Some(rect) = self.take_free_rect(w, h) {
                return Ok(rect);
            }
        }

        Err(Error::atlas_full(w, h))
    }

    /// First-fit guillotine split of a previously-freed rectangle.
    fn take_free_rect(&mut self, w: u32, h: u32) -> Option<Rect> {
        let idx = self.free_rects.iter().position(|r| r.w >= w && r.h >= h)?;
        let free = self.free_rects.remove(idx);
        let placed = Rect::new(free.x, free.y, w, h);

        if free.w > w {
            self.free_rects.push(Rect::new(free.x + w, free.y, free.w - w, h));
        }
        if free.h > h {
            self.free_rects.push(Rect::new(free.x, free.y + h, free.w, free.h - h));
        }
        Some(placed)
    }

    fn append_to_shelf(&mut self, w: u32, h: u32) -> Option<Rect> {
        let width = self.width;
        if let Some(shelf) = self.shelves.iter_mut().find(|s| s.height >= h && width - s.cursor_x >= w) {
            let rect = Rect::new(shelf.cursor_x, shelf.y, w, h);
            shelf.cursor_x += w;
            return Some(rect);
        }

        let top = self.shelves.iter().map(|s| s.y + s.height).max().unwrap_or(0);
        if self.height - top >= h && width >= w {
            self.shelves.push(Shelf { y: top, height: h, cursor_x: w });
            return Some(Rect::new(0, top, w, h));
        }
        None
    }
}
