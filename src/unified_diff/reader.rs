//! A hand-rolled, regex-driven unified-diff parser.
//!
//! The grammar is small enough that a single compiled [`Regex`] per line kind,
//! tried in a fixed order, is simpler than a generated parser: `diff`,
//! `index`, `---` and `+++` lines are *header* lines, a `@@ ... @@` line opens
//! a hunk body, and body lines are dispatched by their first byte alone
//! (` ` context, `+` addition, `-` deletion).

use std::io::{BufRead, Cursor};

use regex::Regex;

use crate::error::{Error, Result};
use crate::patch::{Chunk, Delta};
use crate::unified_diff::model::{UnifiedDiff, UnifiedDiffFile};

/// Which of the recognized line kinds a raw line matched, carrying whatever
/// the match needs for its handler.
enum HeaderKind {
    Diff,
    Index,
    From,
    To,
    Chunk { old_ln: i64, old_size: usize, new_ln: i64, new_size: usize },
}

enum BodyKind {
    Normal,
    Add,
    Del,
}

fn strip_newline(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Parses a unified diff from any [`BufRead`] character source.
///
/// One reader is good for exactly one [`parse`](UnifiedDiffReader::parse)
/// call: the running `old_ln`/`new_ln`/`old_size`/`new_size` and line-number
/// counter are instance state, not reentrant.
///
/// `diff --git` filename extraction splits the line on single spaces and
/// takes tokens 2 and 3; paths containing spaces are not handled specially,
/// matching the same limitation found in comparable hand-rolled parsers.
pub struct UnifiedDiffReader<R> {
    reader: R,
    line_number: usize,
    diff_re: Regex,
    index_re: Regex,
    from_re: Regex,
    to_re: Regex,
    chunk_re: Regex,
    timestamp_re: Regex,
}

impl<R: BufRead> UnifiedDiffReader<R> {
    /// Wraps `reader`, compiling the line-recognition patterns once up front.
    pub fn new(reader: R) -> Self {
        UnifiedDiffReader {
            reader,
            line_number: 0,
            diff_re: Regex::new(r"^diff\s").expect("static pattern"),
            index_re: Regex::new(r"^index [0-9a-zA-Z]+\.\.[0-9a-zA-Z]+(?: \d+)?")
                .expect("static pattern"),
            from_re: Regex::new(r"^---\s").expect("static pattern"),
            to_re: Regex::new(r"^\+\+\+\s").expect("static pattern"),
            chunk_re: Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
                .expect("static pattern"),
            timestamp_re: Regex::new(
                r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?",
            )
            .expect("static pattern"),
        }
    }

    fn read_raw_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn classify_header(&self, line: &str) -> Option<HeaderKind> {
        if self.diff_re.is_match(line) {
            return Some(HeaderKind::Diff);
        }
        if self.index_re.is_match(line) {
            return Some(HeaderKind::Index);
        }
        if self.from_re.is_match(line) {
            return Some(HeaderKind::From);
        }
        if self.to_re.is_match(line) {
            return Some(HeaderKind::To);
        }
        if let Some(caps) = self.chunk_re.captures(line) {
            let old_ln: i64 = caps[1].parse().ok()?;
            let old_size: usize = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            let new_ln: i64 = caps[3].parse().ok()?;
            let new_size: usize = caps.get(4).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            return Some(HeaderKind::Chunk {
                old_ln: if old_ln == 0 { 1 } else { old_ln },
                old_size,
                new_ln: if new_ln == 0 { 1 } else { new_ln },
                new_size,
            });
        }
        None
    }

    fn classify_body(&self, line: &str) -> Option<BodyKind> {
        match line.as_bytes().first() {
            Some(b' ') => Some(BodyKind::Normal),
            Some(b'+') => Some(BodyKind::Add),
            Some(b'-') => Some(BodyKind::Del),
            _ => None,
        }
    }

    fn extract_filename_and_timestamp(&self, line: &str) -> (String, Option<String>) {
        let line = strip_newline(line);
        let (payload, timestamp) = match self.timestamp_re.find(line) {
            Some(m) => (&line[..m.start()], Some(m.as_str().to_string())),
            None => (line, None),
        };
        let filename = if payload.len() >= 4 { &payload[4..] } else { "" };
        let filename = filename
            .strip_prefix("a/")
            .or_else(|| filename.strip_prefix("b/"))
            .or_else(|| filename.strip_prefix("old/"))
            .or_else(|| filename.strip_prefix("new/"))
            .unwrap_or(filename);
        (filename.trim().to_string(), timestamp)
    }

    fn apply_diff(&self, file: &mut UnifiedDiffFile, line: &str) {
        let trimmed = strip_newline(line);
        file.diff_command = Some(trimmed.to_string());
        let tokens: Vec<&str> = trimmed.split(' ').collect();
        if let (Some(&from), Some(&to)) = (tokens.get(2), tokens.get(3)) {
            let strip_ab = |s: &str| {
                s.strip_prefix("a/")
                    .or_else(|| s.strip_prefix("b/"))
                    .unwrap_or(s)
                    .to_string()
            };
            file.from_file = Some(strip_ab(from));
            file.to_file = Some(strip_ab(to));
        }
        log::trace!("unified diff: entered file header via `diff` line");
    }

    fn apply_index(&self, file: &mut UnifiedDiffFile, line: &str) {
        file.index = strip_newline(line)
            .strip_prefix("index ")
            .map(|s| s.to_string());
    }

    fn apply_from(&self, file: &mut UnifiedDiffFile, line: &str) {
        let (filename, timestamp) = self.extract_filename_and_timestamp(line);
        file.from_file = Some(filename);
        file.from_timestamp = timestamp;
    }

    fn apply_to(&self, file: &mut UnifiedDiffFile, line: &str) {
        let (filename, timestamp) = self.extract_filename_and_timestamp(line);
        file.to_file = Some(filename);
        file.to_timestamp = timestamp;
    }

    fn dispatch_header(&self, file: &mut UnifiedDiffFile, line: &str, kind: &HeaderKind) {
        match kind {
            HeaderKind::Diff => self.apply_diff(file, line),
            HeaderKind::Index => self.apply_index(file, line),
            HeaderKind::From => self.apply_from(file, line),
            HeaderKind::To => self.apply_to(file, line),
            HeaderKind::Chunk { .. } => unreachable!("chunk lines are handled by the caller"),
        }
    }

    fn parse_error(&self, line: &str, message: &str) -> Error {
        Error::UnifiedDiffParseError {
            line_number: self.line_number,
            line: line.to_string(),
            message: message.to_string(),
        }
    }

    /// Reads one chunk body following a just-consumed `@@ ... @@` line.
    ///
    /// Returns `Ok(true)` if the chunk terminated and its delta was recorded,
    /// `Ok(false)` if input ended before the termination condition was met (in
    /// which case the partial chunk is discarded, matching the upstream
    /// behavior of never finalizing a chunk left open at end-of-input).
    fn parse_chunk(
        &mut self,
        file: &mut UnifiedDiffFile,
        old_ln: i64,
        old_size: usize,
        new_ln: i64,
        new_size: usize,
    ) -> Result<bool> {
        let mut original: Vec<String> = Vec::new();
        let mut revised: Vec<String> = Vec::new();

        // A header with both counts taken as 0 (whether explicit or
        // omitted — the capture groups can't tell the two apart) would
        // otherwise satisfy the primary termination test before any body
        // line is read, yielding an empty/empty pair that `Delta::new`
        // rejects. Reading at least one line first sidesteps that without
        // changing behavior for any chunk that actually carries lines.
        loop {
            let raw = match self.read_raw_line()? {
                Some(raw) => raw,
                None => {
                    log::debug!("unified diff: input ended mid-chunk, discarding partial hunk");
                    return Ok(false);
                }
            };
            let content = strip_newline(&raw[1.min(raw.len())..]).to_string();
            match self.classify_body(&raw) {
                Some(BodyKind::Normal) => {
                    original.push(content.clone());
                    revised.push(content);
                }
                Some(BodyKind::Add) => revised.push(content),
                Some(BodyKind::Del) => original.push(content),
                None => {
                    return Err(self.parse_error(&raw, "expected a chunk body line"));
                }
            }

            let terminated = (original.len() == old_size && revised.len() == new_size)
                || (old_size == 0
                    && new_size == 0
                    && original.len() == old_ln as usize
                    && revised.len() == new_ln as usize);
            if terminated {
                if old_size == 0 && new_size == 0 {
                    log::warn!(
                        "unified diff: chunk header carried no counts; falling back to start \
                         line numbers ({old_ln}, {new_ln}) as implicit counts"
                    );
                }
                log::debug!("unified diff: chunk closed, leaving body state");
                let delta = Delta::new(
                    Chunk::new((old_ln - 1).max(0) as usize, original),
                    Chunk::new((new_ln - 1).max(0) as usize, revised),
                );
                file.patch.add_delta(delta);
                return Ok(true);
            }
        }
    }

    /// Parses the full stream, consuming `self`.
    pub fn parse(mut self) -> Result<UnifiedDiff> {
        let mut doc = UnifiedDiff::default();
        let mut header = String::new();

        // Preamble: accumulate lines until the first header-kind line.
        let mut current: Option<String> = loop {
            match self.read_raw_line()? {
                Some(line) => {
                    if self.classify_header(&line).is_some() {
                        break Some(line);
                    }
                    header.push_str(&line);
                }
                None => break None,
            }
        };
        doc.header = if header.is_empty() { None } else { Some(header) };

        'outer: while let Some(line) = current.take() {
            let kind = self
                .classify_header(&line)
                .expect("loop invariant: current always holds a header-kind line");
            log::debug!("unified diff: starting new file section");
            let mut file = UnifiedDiffFile::default();

            let mut line = line;
            let mut kind = kind;
            // File-header state: consume DIFF/INDEX/FROM/TO lines until CHUNK.
            loop {
                match kind {
                    HeaderKind::Chunk { old_ln, old_size, new_ln, new_size } => {
                        log::trace!("unified diff: chunk header @@ -{old_ln},{old_size} +{new_ln},{new_size} @@");
                        if !self.parse_chunk(&mut file, old_ln, old_size, new_ln, new_size)? {
                            doc.files.push(file);
                            current = None;
                            break 'outer;
                        }
                        break;
                    }
                    _ => {
                        self.dispatch_header(&mut file, &line, &kind);
                        match self.read_raw_line()? {
                            Some(next) => match self.classify_header(&next) {
                                Some(next_kind) => {
                                    line = next;
                                    kind = next_kind;
                                }
                                None => return Err(self.parse_error(&next, "expected a header or chunk line")),
                            },
                            None => {
                                doc.files.push(file);
                                current = None;
                                break 'outer;
                            }
                        }
                    }
                }
            }

            // Between-chunk / next-file state.
            loop {
                match self.read_raw_line()? {
                    None => {
                        doc.files.push(file);
                        current = None;
                        break 'outer;
                    }
                    Some(next) => {
                        if strip_newline(&next).starts_with("--") {
                            log::debug!("unified diff: `--` terminator, ending file loop");
                            doc.files.push(file);
                            current = None;
                            break 'outer;
                        }
                        match self.classify_header(&next) {
                            Some(HeaderKind::Chunk { old_ln, old_size, new_ln, new_size }) => {
                                if !self.parse_chunk(&mut file, old_ln, old_size, new_ln, new_size)? {
                                    doc.files.push(file);
                                    current = None;
                                    break 'outer;
                                }
                            }
                            Some(_) => {
                                doc.files.push(file);
                                current = Some(next);
                                continue 'outer;
                            }
                            None => {
                                return Err(self.parse_error(&next, "expected a header, chunk, or `--` terminator line"));
                            }
                        }
                    }
                }
            }
        }

        // Trailer: drain whatever's left, verbatim.
        let mut tail = String::new();
        while let Some(line) = self.read_raw_line()? {
            tail.push_str(&line);
        }
        doc.tail = if tail.is_empty() { None } else { Some(tail) };

        Ok(doc)
    }
}

/// Convenience: parses a unified diff held entirely in memory as a `&str`.
pub fn parse_str(text: &str) -> Result<UnifiedDiff> {
    UnifiedDiffReader::new(Cursor::new(text.as_bytes())).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s7_chunk_header_with_counts_and_section_heading() {
        let diff = "--- a/f\n+++ b/f\n@@ -189,6 +189,7 @@ TOKEN: foo\n \
                     ctx\n ctx\n ctx\n ctx\n ctx\n-old\n+new\n+new2\n";
        let doc = parse_str(diff).unwrap();
        assert_eq!(doc.files.len(), 1);
        let delta = &doc.files[0].patch.deltas()[0];
        assert_eq!(delta.original().position(), 188);
        assert_eq!(delta.revised().position(), 188);
    }

    #[test]
    fn s8_chunk_header_without_counts_uses_degenerate_termination() {
        let diff = "--- a/f\n+++ b/f\n@@ -1 +1 @@\n-old\n+new\n";
        let doc = parse_str(diff).unwrap();
        assert_eq!(doc.files.len(), 1);
        assert_eq!(doc.files[0].patch.len(), 1);
        let delta = &doc.files[0].patch.deltas()[0];
        assert_eq!(delta.original().lines(), &["old".to_string()]);
        assert_eq!(delta.revised().lines(), &["new".to_string()]);
    }

    #[test]
    fn s6_filename_edge_case_bare_payload() {
        let diff = "--- .vhd\n+++ .vhd\n@@ -1 +1 @@\n-a\n+b\n";
        let doc = parse_str(diff).unwrap();
        assert_eq!(doc.files[0].from_file.as_deref(), Some(".vhd"));
    }

    #[test]
    fn from_to_lines_extract_timestamps() {
        let diff = "--- a/f\t2024-01-02 03:04:05.000000000 +0000\n\
                     +++ b/f\t2024-01-02 03:04:06.000000000 +0000\n\
                     @@ -1 +1 @@\n-a\n+b\n";
        let doc = parse_str(diff).unwrap();
        let file = &doc.files[0];
        assert_eq!(file.from_file.as_deref(), Some("f"));
        assert_eq!(file.to_file.as_deref(), Some("f"));
        assert!(file.from_timestamp.is_some());
        assert!(file.to_timestamp.is_some());
    }

    #[test]
    fn s5_two_file_diff_with_preamble_and_tail() {
        // file[0] carries three separate hunks, so its patch should end up
        // with three deltas (one per hunk, never split finer).
        let diff = "Subject: [PATCH] example\n\n\
                     diff --git a/x.txt b/x.txt\n\
                     index 1111111..2222222 100644\n\
                     --- a/x.txt\n\
                     +++ b/x.txt\n\
                     @@ -1 +1 @@\n\
                     -one\n+ONE\n\
                     @@ -10 +10 @@\n\
                     -ten\n+TEN\n\
                     @@ -20 +20 @@\n\
                     -twenty\n+TWENTY\n\
                     diff --git a/y.txt b/y.txt\n\
                     index 3333333..4444444 100644\n\
                     --- a/y.txt\n\
                     +++ b/y.txt\n\
                     @@ -1 +1 @@\n\
                     -old\n+new\n\
                     --\n\
                     2.17.1.windows.2\n\n";
        let doc = parse_str(diff).unwrap();
        assert_eq!(doc.files.len(), 2);
        assert_eq!(doc.files[0].from_file.as_deref(), Some("x.txt"));
        assert_eq!(doc.files[0].patch.len(), 3);
        assert_eq!(doc.files[1].patch.len(), 1);
        assert_eq!(doc.tail.as_deref(), Some("2.17.1.windows.2\n\n"));
        assert!(doc.header.as_deref().unwrap().starts_with("Subject:"));
    }

    #[test]
    fn header_and_trailer_preserved_verbatim() {
        let diff = "garbage line one\ngarbage line two\n\
                     --- a/f\n+++ b/f\n@@ -1 +1 @@\n-a\n+b\n\
                     trailing note\nmore trailing\n";
        let doc = parse_str(diff).unwrap();
        assert_eq!(
            doc.header.as_deref(),
            Some("garbage line one\ngarbage line two\n")
        );
        assert_eq!(doc.tail.as_deref(), Some("trailing note\nmore trailing\n"));
    }

    #[test]
    fn unexpected_line_in_chunk_body_is_a_parse_error() {
        // A line not starting with ' ', '+' or '-' inside a chunk body is
        // rejected rather than silently absorbed.
        let diff = "--- a/f\n+++ b/f\n@@ -1,2 +1,2 @@\n ctx\n\tnot-a-body-line\n";
        let err = parse_str(diff).unwrap_err();
        assert!(matches!(err, Error::UnifiedDiffParseError { .. }));
    }

    #[test]
    fn incomplete_trailing_chunk_is_discarded_not_erred() {
        let diff = "--- a/f\n+++ b/f\n@@ -1,5 +1,5 @@\n ctx\n-only one removed line\n";
        let doc = parse_str(diff).unwrap();
        assert_eq!(doc.files.len(), 1);
        assert!(doc.files[0].patch.is_empty());
    }

    #[test]
    fn bare_from_to_form_without_diff_git_line() {
        let diff = "--- a/only.txt\n+++ b/only.txt\n@@ -1 +1 @@\n-x\n+y\n";
        let doc = parse_str(diff).unwrap();
        assert_eq!(doc.files.len(), 1);
        assert!(doc.files[0].diff_command.is_none());
        assert_eq!(doc.files[0].from_file.as_deref(), Some("only.txt"));
    }
}
