//! The document model produced by [`super::UnifiedDiffReader`]: [`UnifiedDiff`]
//! and [`UnifiedDiffFile`].

use crate::patch::Patch;

/// Header metadata and patch for one file section of a unified diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedDiffFile {
    /// The raw `diff --git a/<path> b/<path>` line, if the file section had one.
    pub diff_command: Option<String>,
    /// The text following `index ` on an `index <hash>..<hash>[ <mode>]` line.
    pub index: Option<String>,
    /// Path parsed from the `---` line (or the `diff --git` line, if no `---`
    /// line overrides it).
    pub from_file: Option<String>,
    /// Path parsed from the `+++` line (or the `diff --git` line).
    pub to_file: Option<String>,
    /// Timestamp trailing the `---` line, if present.
    pub from_timestamp: Option<String>,
    /// Timestamp trailing the `+++` line, if present.
    pub to_timestamp: Option<String>,
    /// The chunk-derived deltas for this file, in the order the hunks appeared.
    pub patch: Patch<String>,
}

/// A fully parsed unified diff: zero or more file sections plus whatever free
/// text surrounded them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedDiff {
    /// Free text preceding the first recognized header line, verbatim.
    pub header: Option<String>,
    /// File sections, in the order they appeared.
    pub files: Vec<UnifiedDiffFile>,
    /// Free text following the last body line, verbatim.
    pub tail: Option<String>,
}
