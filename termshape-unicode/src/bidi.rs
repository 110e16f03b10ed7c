pub use unicode_bidi::BidiClass;
use unicode_bidi::{BidiInfo, Level, bidi_class as ub_bidi_class};

/// Resolves the BiDi class of a single code point (UAX #9, table 4).
pub fn bidi_class(ch: char) -> BidiClass {
    ub_bidi_class(ch)
}

/// A maximal run of text sharing one embedding level, with its resolved
/// direction, per spec §3 `Run` / §4.3 step 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte offset of the first character in the run.
    pub start: usize,
    /// Byte length of the run.
    pub len: usize,
    /// Resolved embedding level (0-125); odd levels are RTL.
    pub level: u8,
}

impl BidiRun {
    /// Whether this run is right-to-left.
    pub const fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }
}

/// Per-character embedding levels plus the runs derived from them, for a
/// single paragraph of text.
#[derive(Debug, Clone)]
pub struct BidiAnalysis {
    /// One embedding level per UTF-8 byte offset boundary: `levels[i]`
    /// is the embedding level of the character starting at byte `i`.
    /// Only cluster-start offsets are meaningful.
    pub levels_by_byte: Vec<u8>,
    /// The runs partitioning the paragraph by embedding level.
    pub runs: Vec<BidiRun>,
}

/// Runs the bidirectional algorithm (UAX #9) over `text`, producing
/// per-character embedding levels and the runs they partition into.
///
/// `base_direction` is `None` for auto-detection from the first strong
/// character (the common terminal case), or `Some(true)` / `Some(false)`
/// to force RTL/LTR.
pub fn resolve(text: &str, base_direction: Option<bool>) -> BidiAnalysis {
    let base_level = match base_direction {
        Some(true) => Some(Level::rtl()),
        Some(false) => Some(Level::ltr()),
        None => None,
    };

    let info = BidiInfo::new(text, base_level);

    // `info.levels` is one `Level` per UTF-8 byte of `text`; pad with a
    // trailing sentinel so callers can index up to (and including) `len`.
    let mut levels_by_byte: Vec<u8> = info.levels.iter().map(|l| l.number()).collect();
    levels_by_byte.push(levels_by_byte.last().copied().unwrap_or(0));

    let runs = runs_from_levels(text, &levels_by_byte);

    BidiAnalysis { levels_by_byte, runs }
}

fn runs_from_levels(text: &str, levels_by_byte: &[u8]) -> Vec<BidiRun> {
    let mut runs = Vec::new();
    let mut char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    char_starts.push(text.len());

    if char_starts.len() <= 1 {
        return runs;
    }

    let mut run_start = char_starts[0];
    let mut run_level = levels_by_byte[run_start];

    for window in char_starts.windows(2) {
        let (start, next) = (window[0], window[1]);
        let level = levels_by_byte[start];
        if level != run_level {
            runs.push(BidiRun { start: run_start, len: start - run_start, level: run_level });
            run_start = start;
            run_level = level;
        }
        let _ = next;
    }
    runs.push(BidiRun {
        start: run_start,
        len: text.len() - run_start,
        level: run_level,
    });

    runs
}
