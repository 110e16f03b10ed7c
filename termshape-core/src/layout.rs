//! Line breaking and viewport windowing for scrolling, per spec §4.9.
//!
//! New relative to the teacher (beamterm's terminal grid is already
//! laid out cell-by-cell by the host; nothing here decides where
//! lines break). Grounded in the run/width primitives
//! `termshape-unicode` and `termshape-shape::segment` already expose,
//! and in `CellRenderer`'s cache style (TTL'd `HashMap`, caller-
//! supplied clock) for the line-segment cache.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use termshape_data::SizeQ;
use termshape_unicode::{EastAsianMode, Script, UnicodeOracle};

/// Complexity tier a sample of the text is classified into, per spec
/// §4.9 step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    /// ASCII-only (or close enough): break only on `\n` and width.
    Simple,
    /// Non-ASCII but no RTL/complex script: segment by script, no
    /// BiDi.
    Moderate,
    /// RTL or a single complex (Arabic/Indic) script present.
    Complex,
    /// Both RTL and a complex script present in the sample.
    VeryComplex,
}

/// A contiguous byte range of `text` that is one displayed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub start: usize,
    pub len: usize,
}

/// Number of leading code points sampled to classify a text's
/// complexity (spec §4.9 step 1: "Samples the first 200 code
/// points").
const SAMPLE_SIZE: usize = 200;

/// Default TTL for cached line-segment lists, in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 2_000;

/// Classifies `text`'s complexity from a leading sample of code
/// points (spec §4.9 step 1).
pub fn classify(text: &str) -> Complexity {
    let mut has_non_ascii = false;
    let mut has_rtl = false;
    let mut has_complex_script = false;

    for ch in text.chars().take(SAMPLE_SIZE) {
        if !ch.is_ascii() {
            has_non_ascii = true;
        }
        if matches!(
            termshape_unicode::bidi_class(ch),
            termshape_unicode::BidiClass::R | termshape_unicode::BidiClass::AL
        ) {
            has_rtl = true;
        }
        let script = termshape_unicode::script(ch);
        if matches!(script, Script::Arabic | Script::Hebrew)
            || is_indic(script)
        {
            has_complex_script = true;
        }
    }

    match (has_non_ascii, has_rtl, has_complex_script) {
        (false, _, _) => Complexity::Simple,
        (true, true, true) => Complexity::VeryComplex,
        (true, true, false) | (true, false, true) => Complexity::Complex,
        (true, false, false) => Complexity::Moderate,
    }
}

fn is_indic(script: Script) -> bool {
    matches!(
        script,
        Script::Devanagari | Script::Bengali | Script::Tamil | Script::Telugu | Script::Kannada
            | Script::Malayalam
    )
}

struct CacheEntry {
    segments: Vec<LineSegment>,
    created_at: u64,
}

/// Selects a line-breaking fast path by text complexity and caches the
/// resulting line-segment list, per spec §4.9.
pub struct LayoutPlanner {
    east_asian_mode: EastAsianMode,
    ttl_ms: u64,
    cache: HashMap<(u64, SizeQ, u16), CacheEntry>,
}

impl LayoutPlanner {
    pub fn new(east_asian_mode: EastAsianMode) -> Self {
        Self { east_asian_mode, ttl_ms: DEFAULT_CACHE_TTL_MS, cache: HashMap::new() }
    }

    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Plans line segments for `text` at `font_size` under
    /// `terminal_width` columns, returning the full line list (callers
    /// slice the `viewport` range themselves, since scrolling reuses
    /// the same full plan).
    pub fn plan(&mut self, text: &str, font_size: f32, terminal_width: u16, now_ms: u64) -> Vec<LineSegment> {
        let key = (hash_text(text), SizeQ::quantize(font_size), terminal_width);

        if let Some(entry) = self.cache.get(&key) {
            if now_ms.saturating_sub(entry.created_at) < self.ttl_ms {
                return entry.segments.clone();
            }
        }

        let segments = match classify(text) {
            Complexity::Simple => self.plan_simple(text, terminal_width),
            Complexity::Moderate => self.plan_moderate(text, terminal_width),
            Complexity::Complex | Complexity::VeryComplex => self.plan_complex(text, terminal_width),
        };

        self.cache.insert(key, CacheEntry { segments: segments.clone(), created_at: now_ms });
        segments
    }

    /// Drops every cached plan, e.g. on font or terminal-width change.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Simple fast path: break only on `\n` and terminal width,
    /// assuming every byte is one display column (spec §4.9 step 2).
    fn plan_simple(&self, text: &str, terminal_width: u16) -> Vec<LineSegment> {
        let mut segments = Vec::new();
        let mut line_start = 0usize;
        let mut column = 0u32;

        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                segments.push(LineSegment { start: line_start, len: idx - line_start });
                line_start = idx + 1;
                column = 0;
                continue;
            }
            if terminal_width > 0 && column >= terminal_width as u32 {
                segments.push(LineSegment { start: line_start, len: idx - line_start });
                line_start = idx;
                column = 0;
            }
            column += 1;
        }
        segments.push(LineSegment { start: line_start, len: text.len() - line_start });
        segments
    }

    /// Moderate fast path: segment by script, break at run boundaries
    /// that would overflow; no BiDi (spec §4.9 step 2).
    fn plan_moderate(&self, text: &str, terminal_width: u16) -> Vec<LineSegment> {
        let oracle = UnicodeOracle::new(self.east_asian_mode);
        let runs = termshape_shape::segment(text, Some(false));

        let mut segments = Vec::new();
        let mut line_start = 0usize;
        let mut column = 0u32;

        for run in &runs {
            let run_text = &text[run.start..run.start + run.len];
            if let Some(nl) = run_text.find('\n') {
                let before = &text[line_start..run.start + nl];
                if !before.is_empty() || run.start + nl > line_start {
                    segments.push(LineSegment { start: line_start, len: run.start + nl - line_start });
                }
                line_start = run.start + nl + 1;
                column = 0;
                continue;
            }

            let run_width = oracle.width_str(run_text) as u32;
            if terminal_width > 0 && column + run_width > terminal_width as u32 && column > 0 {
                segments.push(LineSegment { start: line_start, len: run.start - line_start });
                line_start = run.start;
                column = 0;
            }
            column += run_width;
        }

        if line_start <= text.len() {
            segments.push(LineSegment { start: line_start, len: text.len() - line_start });
        }
        segments
    }

    /// Complex/very-complex fast path: full BiDi-aware, grapheme-level
    /// line breaking (spec §4.9 step 2: "full Shaper + BiDi + line
    /// breaking").
    fn plan_complex(&self, text: &str, terminal_width: u16) -> Vec<LineSegment> {
        let oracle = UnicodeOracle::new(self.east_asian_mode);
        let graphemes = oracle.graphemes(text);
        let bidi = oracle.resolve_bidi(text, None);

        let mut segments = Vec::new();
        let mut line_start = 0usize;
        let mut column = 0u32;

        for g in &graphemes {
            let s = g.as_str(text);
            let w = oracle.width_str(s) as u32;
            let at_run_boundary = bidi.runs.iter().any(|r| r.start == g.start);

            if terminal_width > 0 && column + w > terminal_width as u32 && column > 0 {
                segments.push(LineSegment { start: line_start, len: g.start - line_start });
                line_start = g.start;
                column = 0;
            } else if at_run_boundary && column > 0 && column + w > terminal_width as u32 {
                segments.push(LineSegment { start: line_start, len: g.start - line_start });
                line_start = g.start;
                column = 0;
            }

            column += w;

            if s == "\n" {
                segments.push(LineSegment { start: line_start, len: g.start + g.len - line_start });
                line_start = g.start + g.len;
                column = 0;
            }
        }

        if line_start <= text.len() {
            segments.push(LineSegment { start: line_start, len: text.len() - line_start });
        }
        segments
    }
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_text_is_simple() {
        assert_eq!(classify("hello world"), Complexity::Simple);
    }

    #[test]
    fn cjk_without_rtl_is_moderate() {
        assert_eq!(classify("\u{4E2D}\u{6587}"), Complexity::Moderate);
    }

    #[test]
    fn arabic_text_is_complex() {
        assert_eq!(classify("\u{0645}\u{0631}\u{062D}\u{0628}\u{0627}"), Complexity::Complex);
    }

    #[test]
    fn simple_path_breaks_on_newline() {
        let mut planner = LayoutPlanner::new(EastAsianMode::Standard);
        let segments = planner.plan("abc\ndef", 12.0, 80, 0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], LineSegment { start: 0, len: 3 });
        assert_eq!(segments[1], LineSegment { start: 4, len: 3 });
    }

    #[test]
    fn simple_path_wraps_at_terminal_width() {
        let mut planner = LayoutPlanner::new(EastAsianMode::Standard);
        let segments = planner.plan("abcdef", 12.0, 3, 0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len, 3);
        assert_eq!(segments[1].len, 3);
    }

    #[test]
    fn cache_hit_is_pure() {
        let mut planner = LayoutPlanner::new(EastAsianMode::Standard);
        let a = planner.plan("hello", 12.0, 80, 0);
        let b = planner.plan("hello", 12.0, 80, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn cache_expires_after_ttl() {
        let mut planner = LayoutPlanner::new(EastAsianMode::Standard).with_ttl_ms(10);
        planner.plan("hello", 12.0, 80, 0);
        assert_eq!(planner.cache.len(), 1);
        planner.plan("hello", 12.0, 80, 50);
        // still one entry (recomputed, not accumulated)
        assert_eq!(planner.cache.len(), 1);
    }
}
