#![deny(missing_docs)]
//! `udiff-core` is a small, dependency-light library for computing and
//! parsing line-oriented text diffs.
//!
//! It has two independent halves that share one data model ([`Chunk`],
//! [`Delta`], [`Patch`]):
//!
//! * [`myers`] computes a minimal [`Patch`] from two sequences using the
//!   classic, textbook formulation of Myers' `O((N+M)D)` shortest-edit-script
//!   algorithm (Myers, E.W. *An O(ND) difference algorithm and its
//!   variations*, Algorithmica 1, 251-266, 1986), with a full diagonal-indexed
//!   `V` array and backward path reconstruction through an arena of
//!   predecessor-linked nodes.
//! * [`unified_diff`] goes the other way: it parses unified-diff text (the
//!   format produced by `diff -u` / `git diff`) back into the same
//!   [`Patch`] model.
//!
//! Neither half depends on the other. Computing a diff and printing it as
//! unified-diff text, or formatting a patch some other way entirely, is left
//! to the caller; this crate only computes and parses.
//!
//! ```
//! # use udiff_core::myers;
//! let before = ["a", "b", "c"];
//! let after = ["a", "x", "c"];
//! let patch = myers::diff_eq(&before, &after).unwrap();
//! assert_eq!(patch.len(), 1);
//! assert!(patch.deltas()[0].is_change());
//! ```
//!
//! ```
//! # use udiff_core::unified_diff;
//! let text = "--- a/f\n+++ b/f\n@@ -1 +1 @@\n-old\n+new\n";
//! let doc = unified_diff::parse_str(text).unwrap();
//! assert_eq!(doc.files[0].patch.len(), 1);
//! ```

mod error;
mod patch;

pub mod myers;
pub mod sources;
pub mod unified_diff;

pub use error::{Error, Result};
pub use patch::{Chunk, Delta, Patch};
