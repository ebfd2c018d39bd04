//! The shared data model: [`Chunk`], [`Delta`] and [`Patch`].
//!
//! Both the Myers engine ([`crate::myers`]) and the unified-diff parser
//! ([`crate::unified_diff`]) produce values of these types; neither knows
//! about the other.

/// A contiguous run of elements drawn from one side of a comparison.
///
/// `position` is the 0-based index into the originating sequence of the
/// run's first element. For an empty chunk, `position` is the notional
/// insertion point rather than an existing element's index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk<T> {
    position: usize,
    lines: Vec<T>,
}

impl<T> Chunk<T> {
    /// Creates a new chunk starting at `position` with the given `lines`.
    pub fn new(position: usize, lines: Vec<T>) -> Self {
        Chunk { position, lines }
    }

    /// The notional insertion point, or the index of the first element.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of elements in this chunk.
    pub fn size(&self) -> usize {
        self.lines.len()
    }

    /// Whether this chunk holds no elements.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The elements held by this chunk, in order.
    pub fn lines(&self) -> &[T] {
        &self.lines
    }

    /// The index one past the last element covered by this chunk.
    pub fn end(&self) -> usize {
        self.position + self.lines.len()
    }
}

/// One localized edit pairing an *original* chunk with a *revised* chunk.
///
/// The variant is fully determined by the sizes of the two chunks (see
/// [`Delta::new`]); there is no way to construct, say, an `Insert` whose
/// original chunk is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Delta<T> {
    /// `original` is empty, `revised` is non-empty.
    Insert {
        original: Chunk<T>,
        revised: Chunk<T>,
    },
    /// `original` is non-empty, `revised` is empty.
    Delete {
        original: Chunk<T>,
        revised: Chunk<T>,
    },
    /// Both chunks are non-empty.
    Change {
        original: Chunk<T>,
        revised: Chunk<T>,
    },
}

impl<T> Delta<T> {
    /// Builds a [`Delta`], deriving its variant from the sizes of the two
    /// chunks.
    ///
    /// # Panics
    ///
    /// Panics if both chunks are empty: that pairing describes no edit and
    /// is never produced by either [`crate::myers`] or
    /// [`crate::unified_diff`].
    pub fn new(original: Chunk<T>, revised: Chunk<T>) -> Self {
        match (original.is_empty(), revised.is_empty()) {
            (true, false) => Delta::Insert { original, revised },
            (false, true) => Delta::Delete { original, revised },
            (false, false) => Delta::Change { original, revised },
            (true, true) => panic!("a delta must have at least one non-empty chunk"),
        }
    }

    /// The chunk on the original (`before`) side.
    pub fn original(&self) -> &Chunk<T> {
        match self {
            Delta::Insert { original, .. }
            | Delta::Delete { original, .. }
            | Delta::Change { original, .. } => original,
        }
    }

    /// The chunk on the revised (`after`) side.
    pub fn revised(&self) -> &Chunk<T> {
        match self {
            Delta::Insert { revised, .. }
            | Delta::Delete { revised, .. }
            | Delta::Change { revised, .. } => revised,
        }
    }

    /// Whether this delta is a pure insertion.
    pub fn is_insert(&self) -> bool {
        matches!(self, Delta::Insert { .. })
    }

    /// Whether this delta is a pure deletion.
    pub fn is_delete(&self) -> bool {
        matches!(self, Delta::Delete { .. })
    }

    /// Whether this delta replaces one non-empty run with another.
    pub fn is_change(&self) -> bool {
        matches!(self, Delta::Change { .. })
    }
}

/// An ordered, non-overlapping sequence of [`Delta`]s relating two
/// sequences.
///
/// Deltas are ordered by ascending `position` of their original chunks; a
/// `Patch` never re-sorts what's handed to it via [`Patch::add_delta`] since
/// both producers (the Myers engine's reconstruction and the unified-diff
/// parser's hunk-by-hunk emission) already produce deltas in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch<T> {
    deltas: Vec<Delta<T>>,
}

impl<T> Patch<T> {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Patch { deltas: Vec::new() }
    }

    /// Appends `delta`, preserving caller-supplied order.
    pub fn add_delta(&mut self, delta: Delta<T>) {
        self.deltas.push(delta);
    }

    /// A read-only view of the deltas, in order.
    pub fn deltas(&self) -> &[Delta<T>] {
        &self.deltas
    }

    /// Whether this patch contains no deltas (i.e. the two sequences it
    /// relates are equivalent under the comparison used to produce it).
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Number of deltas in this patch.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }
}

impl<T> IntoIterator for Patch<T> {
    type Item = Delta<T>;
    type IntoIter = std::vec::IntoIter<Delta<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Patch<T> {
    type Item = &'a Delta<T>;
    type IntoIter = std::slice::Iter<'a, Delta<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_variant_is_derived_from_sizes() {
        let insert = Delta::new(Chunk::new(0, Vec::<&str>::new()), Chunk::new(0, vec!["x"]));
        assert!(insert.is_insert());

        let delete = Delta::new(Chunk::new(0, vec!["x"]), Chunk::new(0, Vec::<&str>::new()));
        assert!(delete.is_delete());

        let change = Delta::new(Chunk::new(1, vec!["b"]), Chunk::new(1, vec!["x"]));
        assert!(change.is_change());
    }

    #[test]
    #[should_panic]
    fn delta_rejects_two_empty_chunks() {
        Delta::new(Chunk::new(0, Vec::<&str>::new()), Chunk::new(0, Vec::<&str>::new()));
    }

    #[test]
    fn patch_preserves_insertion_order() {
        let mut patch = Patch::new();
        assert!(patch.is_empty());
        patch.add_delta(Delta::new(Chunk::new(0, vec!["a"]), Chunk::new(0, vec!["b"])));
        patch.add_delta(Delta::new(Chunk::new(2, vec!["c"]), Chunk::new(2, vec!["d"])));
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.deltas()[0].original().position(), 0);
        assert_eq!(patch.deltas()[1].original().position(), 2);
    }
}
