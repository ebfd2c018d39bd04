//! A minimal line tokenizer for the common case of diffing text.
//!
//! This sits above the generic engine in [`crate::myers`], which operates on
//! plain `&[T]` slices under a caller-supplied equivalence; it exists purely
//! so callers diffing text don't each reimplement line-splitting the same
//! way. It is not a string/file diffing façade: it has no opinion on which
//! algorithm to run or how to format the result.

use memchr::memchr;

/// Splits `text` into lines, including the trailing line terminator (`\n`,
/// or `\r\n`) on each line that has one.
///
/// Keeping the terminator means that a file whose last line gained or lost
/// its trailing newline is itself detected as a change by the diff engine,
/// rather than silently compared as if the two files were identical.
pub fn lines(text: &str) -> Lines<'_> {
    Lines(text)
}

/// Iterator over the lines of a `&str`, see [`lines`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Lines<'a>(&'a str);

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }
        let split_at = memchr(b'\n', self.0.as_bytes()).map_or(self.0.len(), |pos| pos + 1);
        let (line, rest) = self.0.split_at(split_at);
        self.0 = rest;
        Some(line)
    }
}

/// Convenience: collects [`lines`] into a `Vec` ready to hand to
/// [`crate::myers::diff_eq`].
pub fn collect_lines(text: &str) -> Vec<&str> {
    lines(text).collect()
}
