//! Line-level edit scripts.
//!
//! The differ turns two sequences into an ordered list of maximal runs
//! (`Equal`, `Removed`, `Added`). Where a removal and an insertion happen at
//! the same location, the `Removed` run always comes first; the merge pass
//! relies on that ordering.

use std::hash::Hash;

use difflib::sequencematcher::{Match, SequenceMatcher};

/// Classification of one run of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RunKind {
    Equal,
    Removed,
    Added,
}

/// A contiguous span of the diff result, borrowing its lines from the
/// original (`Equal`, `Removed`) or the candidate (`Added`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRun<'a, T> {
    pub kind: RunKind,
    pub lines: &'a [T],
}

impl<'a, T> EditRun<'a, T> {
    pub fn new(kind: RunKind, lines: &'a [T]) -> Self {
        EditRun { kind, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Matching algorithm used to align the two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffAlgorithm {
    /// Myers' O(ND) diff; keeps a longest common subsequence, so the edit
    /// script is minimal.
    #[default]
    Myers,
    /// Patience diff, anchored on lines unique to both sides.
    Patience,
    /// `difflib`'s SequenceMatcher (Ratcliff/Obershelp style). Anchors on
    /// the longest contiguous block, which can cost common lines elsewhere.
    SequenceMatcher,
}

impl DiffAlgorithm {
    /// Matching blocks for `a` and `b` with this algorithm.
    ///
    /// Blocks are ordered and non-overlapping. The list ends with a
    /// zero-sized sentinel at `(a.len(), b.len())`.
    pub fn get_matching_blocks<T: Eq + Hash + Ord>(self, a: &[T], b: &[T]) -> Vec<Match> {
        match self {
            DiffAlgorithm::Myers => similar_matching_blocks(similar::Algorithm::Myers, a, b),
            DiffAlgorithm::Patience => similar_matching_blocks(similar::Algorithm::Patience, a, b),
            DiffAlgorithm::SequenceMatcher => SequenceMatcher::new(a, b).get_matching_blocks(),
        }
    }
}

fn similar_matching_blocks<T: Eq + Hash + Ord>(alg: similar::Algorithm, a: &[T], b: &[T]) -> Vec<Match> {
    let mut blocks: Vec<Match> = vec![];
    for op in similar::capture_diff_slices(alg, a, b) {
        if let similar::DiffOp::Equal {
            old_index,
            new_index,
            len,
        } = op
        {
            blocks.push(Match {
                first_start: old_index,
                second_start: new_index,
                size: len,
            });
        }
    }
    blocks.push(Match {
        first_start: a.len(),
        second_start: b.len(),
        size: 0,
    });
    blocks
}

/// Diff `original` against `candidate` with the default algorithm.
pub fn diff<'a, T: Eq + Hash + Ord>(original: &'a [T], candidate: &'a [T]) -> Vec<EditRun<'a, T>> {
    diff_with(DiffAlgorithm::default(), original, candidate)
}

/// Diff `original` against `candidate`.
///
/// Walks the matching blocks; the gap before each block becomes a `Removed`
/// run (original side) followed by an `Added` run (candidate side), and the
/// block itself an `Equal` run. Empty runs are never emitted.
pub fn diff_with<'a, T: Eq + Hash + Ord>(
    algorithm: DiffAlgorithm,
    original: &'a [T],
    candidate: &'a [T],
) -> Vec<EditRun<'a, T>> {
    let mut runs = vec![];
    let mut ia = 0;
    let mut ib = 0;

    for m in coalesce(algorithm.get_matching_blocks(original, candidate)) {
        // matcher invariants, not input validation:
        debug_assert!(m.first_start >= ia);
        debug_assert!(m.second_start >= ib);

        push_run(&mut runs, RunKind::Removed, &original[ia..m.first_start]);
        push_run(&mut runs, RunKind::Added, &candidate[ib..m.second_start]);
        push_run(
            &mut runs,
            RunKind::Equal,
            &original[m.first_start..m.first_start + m.size],
        );

        ia = m.first_start + m.size;
        ib = m.second_start + m.size;
    }
    push_run(&mut runs, RunKind::Removed, &original[ia..]);
    push_run(&mut runs, RunKind::Added, &candidate[ib..]);

    runs
}

/// Drop zero-sized blocks (including the trailing sentinel) and join blocks
/// that touch in both sequences, so no two `Equal` runs end up adjacent.
fn coalesce(blocks: Vec<Match>) -> Vec<Match> {
    let mut ret: Vec<Match> = Vec::with_capacity(blocks.len());
    for m in blocks.into_iter().filter(|m| m.size > 0) {
        if let Some(last) = ret.last_mut() {
            if last.first_start + last.size == m.first_start
                && last.second_start + last.size == m.second_start
            {
                last.size += m.size;
                continue;
            }
        }
        ret.push(m);
    }
    ret
}

fn push_run<'a, T>(runs: &mut Vec<EditRun<'a, T>>, kind: RunKind, lines: &'a [T]) {
    if !lines.is_empty() {
        runs.push(EditRun::new(kind, lines));
    }
}
