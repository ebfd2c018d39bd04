#![no_main]

use libfuzzer_sys::arbitrary;
use libfuzzer_sys::fuzz_target;
use udiff_core::myers;

#[derive(arbitrary::Arbitrary, Debug)]
struct Input<'a> {
    before: &'a str,
    after: &'a str,
}

fn apply(a: &[String], patch: &udiff_core::Patch<String>) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    for delta in patch {
        let orig = delta.original();
        out.extend_from_slice(&a[pos..orig.position()]);
        out.extend_from_slice(delta.revised().lines());
        pos = orig.end();
    }
    out.extend_from_slice(&a[pos..]);
    out
}

/// Checks, for arbitrary line sequences, that the engine never panics and
/// that any patch it does return actually reconstructs `after` from `before`
/// with ordered, non-overlapping deltas.
fn do_fuzz(input: Input<'_>) {
    let before: Vec<String> = udiff_core::sources::lines(input.before)
        .map(|l| l.to_string())
        .collect();
    let after: Vec<String> = udiff_core::sources::lines(input.after)
        .map(|l| l.to_string())
        .collect();

    let patch = match myers::diff_eq(&before, &after) {
        Ok(patch) => patch,
        Err(_) => return,
    };

    assert_eq!(apply(&before, &patch), after);

    let mut last_end = None;
    for delta in &patch {
        let pos = delta.original().position();
        if let Some(last_end) = last_end {
            assert!(pos >= last_end);
        }
        last_end = Some(delta.original().end());
    }
}

fuzz_target!(|input: Input<'_>| {
    do_fuzz(input);
});
