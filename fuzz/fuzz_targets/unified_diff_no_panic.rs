#![no_main]

use libfuzzer_sys::fuzz_target;
use udiff_core::unified_diff;

/// The parser must never panic on arbitrary text, however malformed; a
/// rejected input should come back as `Err(UnifiedDiffParseError)` or
/// similar, never a crash.
fuzz_target!(|text: &str| {
    let _ = unified_diff::parse_str(text);
});
