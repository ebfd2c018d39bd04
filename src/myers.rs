//! A clean-room implementation of Myers' `O((N+M)D)` shortest-edit-script
//! algorithm.
//!
//! This is the textbook, full-`V`-array formulation (not the linear-space
//! divide-and-conquer variant): every furthest-reaching path end point for
//! every diagonal visited is kept in a single arena so that the terminal
//! node can be walked backward through its predecessor chain to recover the
//! edit script. See Myers, E.W. *An O(ND) difference algorithm and its
//! variations*, Algorithmica 1, 251-266 (1986).

use log::trace;

use crate::error::{Error, Result};
use crate::patch::{Chunk, Delta, Patch};

/// One point on the edit graph path, plus a link back to its predecessor.
///
/// A `snake` node represents the end of a (possibly zero-length) run of
/// diagonal (matching) moves; a non-snake ("diff") node represents a single
/// horizontal or vertical (edit) move. The two share the same shape -
/// coordinates plus an optional predecessor index into the same arena - so
/// they're modeled as one struct with a tag rather than two unrelated types.
#[derive(Debug, Clone, Copy)]
struct Node {
    i: i64,
    j: i64,
    pred: Option<usize>,
    snake: bool,
}

/// A lightweight view over the furthest-reaching arena indices indexed by
/// diagonal `k`, which ranges over `[-d, d]` and may be negative.
struct VArray {
    middle: i64,
    slots: Vec<Option<usize>>,
}

impl VArray {
    fn new(max_d: usize) -> Self {
        let size = 1 + 2 * (max_d + 1);
        VArray {
            middle: (size / 2) as i64,
            slots: vec![None; size],
        }
    }

    fn get(&self, k: i64) -> Option<usize> {
        self.slots[(self.middle + k) as usize]
    }

    fn set(&mut self, k: i64, node: usize) {
        self.slots[(self.middle + k) as usize] = Some(node);
    }

    /// Correctness-neutral: the diagonal at `k` will never be read again
    /// once round `d` (keyed here by its predecessor diagonal `k = d - 1`)
    /// has finished, so an implementation may drop it eagerly.
    fn clear(&mut self, k: i64) {
        let idx = self.middle + k;
        if idx >= 0 && (idx as usize) < self.slots.len() {
            self.slots[idx as usize] = None;
        }
    }
}

/// Computes a minimal [`Patch`] transforming `a` into `b` under the
/// caller-supplied equivalence `eq`.
///
/// `eq` need not be structural equality - see [`diff_eq`] for the common
/// case where it is. `eq` is expected to behave like an equivalence relation
/// (reflexive, symmetric, transitive); that is the caller's responsibility,
/// not this function's.
///
/// A null input sequence can't be represented by Rust's `&[T]` (the type
/// system already rules it out), so [`Error::ArgumentError`] is reserved for
/// callers assembling a [`Patch`] by hand rather than ever being returned
/// from here.
pub fn diff<T, F>(a: &[T], b: &[T], eq: F) -> Result<Patch<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let n = a.len() as i64;
    let m = b.len() as i64;
    let max_d = (n + m) as usize;

    let mut v = VArray::new(max_d);
    let mut arena: Vec<Node> = Vec::with_capacity(max_d * 2 + 2);

    // Seed: a synthetic snake at (0, -1) so the very first step (d=0, k=0)
    // takes the k=-d branch and starts the walk at (0, 0).
    arena.push(Node {
        i: 0,
        j: -1,
        pred: None,
        snake: true,
    });
    v.set(1, 0);

    let mut terminal = None;

    'outer: for d in 0..=max_d as i64 {
        let mut k = -d;
        while k <= d {
            let insert = if k == -d {
                true
            } else if k == d {
                false
            } else {
                let from_below = arena[v.get(k - 1).expect("diagonal k-1 populated")].i;
                let from_above = arena[v.get(k + 1).expect("diagonal k+1 populated")].i;
                from_below < from_above
            };

            let (i_start, pred_idx) = if insert {
                let pred_idx = v.get(k + 1).expect("diagonal k+1 populated");
                (arena[pred_idx].i, pred_idx)
            } else {
                let pred_idx = v.get(k - 1).expect("diagonal k-1 populated");
                (arena[pred_idx].i + 1, pred_idx)
            };
            let mut i = i_start;
            let mut j = i - k;

            let diff_idx = arena.len();
            arena.push(Node {
                i,
                j,
                pred: Some(pred_idx),
                snake: false,
            });

            let mut matched = false;
            while i < n && j < m && eq(&a[i as usize], &b[j as usize]) {
                i += 1;
                j += 1;
                matched = true;
            }

            let current_idx = if matched {
                let snake_idx = arena.len();
                arena.push(Node {
                    i,
                    j,
                    pred: Some(diff_idx),
                    snake: true,
                });
                snake_idx
            } else {
                diff_idx
            };

            v.set(k, current_idx);

            if i >= n && j >= m {
                trace!("myers: reached sink ({n},{m}) at d={d}, k={k}");
                terminal = Some(current_idx);
                break 'outer;
            }

            k += 2;
        }
        v.clear(d - 1);
    }

    let terminal = terminal.ok_or(Error::DifferentiationFailed { max_d })?;
    reconstruct(&arena, terminal, a, b)
}

/// Convenience wrapper over [`diff`] using `T`'s own [`PartialEq`] as the
/// equivalence predicate.
pub fn diff_eq<T>(a: &[T], b: &[T]) -> Result<Patch<T>>
where
    T: Clone + PartialEq,
{
    diff(a, b, |x, y| x == y)
}

/// Walks the terminal node's predecessor chain backward, emitting one delta
/// per *run* of edit moves, then reverses the result so deltas come out in
/// ascending `position` order.
///
/// A run is a maximal chain of diff nodes reached with no intervening snake
/// - i.e. consecutive delete/insert moves with no match between them. Each
/// diff node's `pred` only points at the immediately preceding node on
/// diagonal `k±1`, which is itself a diff node when no match occurred there
/// either, so a run can span more than one node. Collapsing the whole run
/// into a single delta anchored at the nearest snake (java-diff-utils calls
/// this `previousSnake()`) is what turns an adjacent delete+insert into one
/// `Change`, matching §3's variant discipline.
fn reconstruct<T: Clone>(arena: &[Node], terminal: usize, a: &[T], b: &[T]) -> Result<Patch<T>> {
    let mut current = terminal;
    if arena[current].snake {
        current = arena[current].pred.ok_or_else(|| {
            Error::InvariantViolation("terminal snake node has no predecessor".to_string())
        })?;
    }

    let mut deltas = Vec::new();

    loop {
        if arena[current].snake {
            return Err(Error::InvariantViolation(
                "expected a diff node while walking the path, found a snake".to_string(),
            ));
        }

        // `current` is the last move of a run; walk `run_start` back through
        // any earlier diff nodes in the same run until the nearest snake is
        // found, without disturbing `current`'s own coordinates.
        let (i, j) = (arena[current].i, arena[current].j);
        let mut run_start = current;
        while let Some(p) = arena[run_start].pred {
            if arena[p].snake {
                break;
            }
            run_start = p;
        }

        let anchor_idx = arena[run_start].pred.ok_or_else(|| {
            Error::InvariantViolation("diff node has no predecessor".to_string())
        })?;

        if arena[anchor_idx].j < 0 {
            // Reached the seed: nothing real precedes this run. The seed's
            // own node (i=0, j=0) carries no edit of its own - it is purely
            // structural - so only emit if the run actually advanced past
            // the origin.
            if i > 0 || j > 0 {
                let original = Chunk::new(0, a[0..i as usize].to_vec());
                let revised = Chunk::new(0, b[0..j as usize].to_vec());
                deltas.push(Delta::new(original, revised));
            }
            break;
        }

        let (i_anchor, j_anchor) = (arena[anchor_idx].i, arena[anchor_idx].j);
        let original = Chunk::new(
            i_anchor as usize,
            a[i_anchor as usize..i as usize].to_vec(),
        );
        let revised = Chunk::new(
            j_anchor as usize,
            b[j_anchor as usize..j as usize].to_vec(),
        );
        deltas.push(Delta::new(original, revised));

        // Step past the anchoring snake to whatever preceded it.
        current = arena[anchor_idx].pred.ok_or_else(|| {
            Error::InvariantViolation("snake node has no predecessor".to_string())
        })?;
    }

    deltas.reverse();
    let mut patch = Patch::new();
    for delta in deltas {
        patch.add_delta(delta);
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn s1_identical_sequences_yield_empty_patch() {
        let a = lines(&["a", "b", "c"]);
        let b = lines(&["a", "b", "c"]);
        let patch = diff_eq(&a, &b).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn s2_pure_insertion() {
        let a: Vec<String> = vec![];
        let b = lines(&["x"]);
        let patch = diff_eq(&a, &b).unwrap();
        assert_eq!(patch.len(), 1);
        let delta = &patch.deltas()[0];
        assert!(delta.is_insert());
        assert_eq!(delta.original().position(), 0);
        assert_eq!(delta.revised().position(), 0);
        assert_eq!(delta.revised().lines(), &["x".to_string()]);
    }

    #[test]
    fn s3_pure_deletion() {
        let a = lines(&["x"]);
        let b: Vec<String> = vec![];
        let patch = diff_eq(&a, &b).unwrap();
        assert_eq!(patch.len(), 1);
        let delta = &patch.deltas()[0];
        assert!(delta.is_delete());
        assert_eq!(delta.original().position(), 0);
        assert_eq!(delta.original().lines(), &["x".to_string()]);
    }

    #[test]
    fn s4_single_change_in_the_middle() {
        let a = lines(&["a", "b", "c", "d"]);
        let b = lines(&["a", "x", "c", "d"]);
        let patch = diff_eq(&a, &b).unwrap();
        assert_eq!(patch.len(), 1);
        let delta = &patch.deltas()[0];
        assert!(delta.is_change());
        assert_eq!(delta.original().position(), 1);
        assert_eq!(delta.original().lines(), &["b".to_string()]);
        assert_eq!(delta.revised().position(), 1);
        assert_eq!(delta.revised().lines(), &["x".to_string()]);
    }

    #[test]
    fn adjacent_substitutions_collapse_into_one_change() {
        // Two consecutive elements both change with no matching element
        // between them, so the delete of "b","c" and the insert of "x","y"
        // share one diagonal run and must come out as a single `Change`
        // rather than an adjacent `Delete` + `Insert` pair.
        let a = lines(&["a", "b", "c", "d"]);
        let b = lines(&["a", "x", "y", "d"]);
        let patch = diff_eq(&a, &b).unwrap();
        assert_eq!(patch.len(), 1);
        let delta = &patch.deltas()[0];
        assert!(delta.is_change());
        assert_eq!(delta.original().position(), 1);
        assert_eq!(
            delta.original().lines(),
            &["b".to_string(), "c".to_string()]
        );
        assert_eq!(delta.revised().position(), 1);
        assert_eq!(
            delta.revised().lines(),
            &["x".to_string(), "y".to_string()]
        );
    }

    fn apply(a: &[String], patch: &Patch<String>) -> Vec<String> {
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

    fn edit_cost(patch: &Patch<String>) -> usize {
        patch
            .deltas()
            .iter()
            .map(|d| d.original().size() + d.revised().size())
            .sum()
    }

    fn random_lines(seed: &mut u64, alphabet: &[&str], len: usize) -> Vec<String> {
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let idx = ((*seed >> 33) as usize) % alphabet.len();
            out.push(alphabet[idx].to_string());
        }
        out
    }

    #[test]
    fn reconstruction_invariant_holds_over_random_inputs() {
        let alphabet = ["a", "b", "c", "d", "e"];
        let mut seed = 0xC0FFEEu64;
        for len_a in 0..8 {
            for len_b in 0..8 {
                let a = random_lines(&mut seed, &alphabet, len_a);
                let b = random_lines(&mut seed, &alphabet, len_b);
                let patch = diff_eq(&a, &b).unwrap();
                assert_eq!(apply(&a, &patch), b, "a={a:?} b={b:?}");

                let mut last_end = None;
                for delta in &patch {
                    let pos = delta.original().position();
                    if let Some(last_end) = last_end {
                        assert!(pos >= last_end, "deltas must be ordered and non-overlapping");
                    }
                    last_end = Some(delta.original().end());
                }
            }
        }
    }

    #[test]
    fn symmetry_of_cost() {
        let alphabet = ["a", "b", "c"];
        let mut seed = 7u64;
        for _ in 0..20 {
            let a = random_lines(&mut seed, &alphabet, 6);
            let b = random_lines(&mut seed, &alphabet, 6);
            let forward = diff_eq(&a, &b).unwrap();
            let backward = diff_eq(&b, &a).unwrap();
            assert_eq!(edit_cost(&forward), edit_cost(&backward));
        }
    }

    #[test]
    fn determinism() {
        let a = lines(&["a", "b", "x", "x", "y"]);
        let b = lines(&["b", "a", "x", "y", "x"]);
        let first = diff_eq(&a, &b).unwrap();
        let second = diff_eq(&a, &b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn custom_equivalence_predicate_is_honored() {
        // Case-insensitive equivalence: "A" and "a" are the same element.
        let a = lines(&["A", "b", "C"]);
        let b = lines(&["a", "b", "c"]);
        let patch = diff(&a, &b, |x: &String, y: &String| x.to_lowercase() == y.to_lowercase())
            .unwrap();
        assert!(patch.is_empty());
    }
}
