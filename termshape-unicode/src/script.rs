pub use unicode_script::Script;
use unicode_script::UnicodeScript;

/// Resolves a code point's script.
///
/// `Common` and `Inherited` code points (punctuation, combining marks,
/// digits) don't terminate a script run by themselves; the caller
/// (the Shaper's run segmentation, spec §4.3 step 2) treats them as
/// joining whichever run precedes them.
pub fn script(ch: char) -> Script {
    ch.script()
}

/// Whether `script` is one that participates in run segmentation on its
/// own, as opposed to joining an adjacent run.
pub fn is_run_terminating(script: Script) -> bool {
    !matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}
