use termshape_unicode::{bidi_class, is_run_terminating, resolve, script, BidiClass, Script};

/// A maximal run of text sharing one script and one BiDi embedding
/// level (spec §4.3 steps 2-3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    pub start: usize,
    pub len: usize,
    pub script: Script,
    pub level: u8,
}

impl Run {
    pub const fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }
}

/// Partitions `text` first by script (common/inherited code points
/// join the preceding run), then splits at BiDi embedding-level
/// boundaries within each script run.
pub fn segment(text: &str, base_direction: Option<bool>) -> Vec<Run> {
    let script_runs = segment_by_script(text);
    let bidi = resolve(text, base_direction);

    let mut runs = Vec::new();
    for script_run in script_runs {
        let sub_runs = bidi
            .runs
            .iter()
            .filter(|r| r.start < script_run.start + script_run.len && r.start + r.len > script_run.start);

        for bidi_run in sub_runs {
            let start = script_run.start.max(bidi_run.start);
            let end = (script_run.start + script_run.len).min(bidi_run.start + bidi_run.len);
            if end > start {
                runs.push(Run {
                    start,
                    len: end - start,
                    script: script_run.script,
                    level: bidi_run.level,
                });
            }
        }
    }

    runs
}

struct ScriptRun {
    start: usize,
    len: usize,
    script: Script,
}

fn segment_by_script(text: &str) -> Vec<ScriptRun> {
    let mut runs: Vec<ScriptRun> = Vec::new();

    for (offset, ch) in text.char_indices() {
        let ch_script = script(ch);
        let terminating = is_run_terminating(ch_script);

        match runs.last_mut() {
            Some(last) if !terminating => {
                last.len += ch.len_utf8();
            }
            Some(last) if last.script == ch_script => {
                last.len += ch.len_utf8();
            }
            _ => {
                runs.push(ScriptRun { start: offset, len: ch.len_utf8(), script: ch_script });
            }
        }
    }

    runs
}

/// Whether `ch`'s BiDi class is one that never starts its own run
/// (shared with run-script joining logic above; exposed for callers
/// reasoning about neutral characters directly).
pub fn is_neutral(ch: char) -> bool {
    matches!(bidi_class(ch), BidiClass::WS | BidiClass::ON | BidiClass::CS | BidiClass::ES | BidiClass::ET)
}
