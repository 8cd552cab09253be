//! Build pass: render an edit script as one merged sequence with
//! conflict markers, recording where each conflict region's lines live.

use std::ops::RangeInclusive;

use tracing::{debug, trace};

use crate::diff::{diff_with, DiffAlgorithm, EditRun, RunKind};
use crate::error::{MergeError, Result};

/// Marker lines written around each conflict region.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Markers {
    /// Opens the old side.
    pub old: String,
    /// Separates the old side from the new side.
    pub separator: String,
    /// Closes the new side.
    pub new: String,
}

impl Markers {
    pub fn new(old: &str, separator: &str, new: &str) -> Self {
        Markers {
            old: old.to_string(),
            separator: separator.to_string(),
            new: new.to_string(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Markers::new(">>>>>>> OLD CODE", "=======", ">>>>>>> NEW CODE")
    }
}

/// One unresolved conflict, as line indices into the merged sequence.
///
/// `old_lines` starts with the old marker and is followed directly by
/// `merge_line`; `new_lines` follows `merge_line` directly and ends with
/// the new marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ConflictRegion {
    pub old_lines: Vec<usize>,
    pub merge_line: usize,
    pub new_lines: Vec<usize>,
}

impl ConflictRegion {
    pub fn old_marker(&self) -> Option<usize> {
        self.old_lines.first().copied()
    }

    pub fn new_marker(&self) -> Option<usize> {
        self.new_lines.last().copied()
    }

    /// Indices of the removed content, without the marker.
    pub fn old_content(&self) -> &[usize] {
        self.old_lines.get(1..).unwrap_or(&[])
    }

    /// Indices of the inserted content, without the marker.
    pub fn new_content(&self) -> &[usize] {
        match self.new_lines.split_last() {
            Some((_, content)) => content,
            None => &[],
        }
    }

    /// Nothing was removed: the region only shows inserted lines.
    pub fn is_insertion(&self) -> bool {
        self.old_content().is_empty()
    }

    /// Nothing was inserted: the region only shows removed lines.
    pub fn is_deletion(&self) -> bool {
        self.new_content().is_empty()
    }

    /// First to last line of the region, markers included.
    pub fn span(&self) -> RangeInclusive<usize> {
        let start = self.old_marker().unwrap_or(self.merge_line);
        let end = self.new_marker().unwrap_or(self.merge_line);
        start..=end
    }

    pub fn contains(&self, line: usize) -> bool {
        line == self.merge_line || self.old_lines.contains(&line) || self.new_lines.contains(&line)
    }

    /// Check the region is well formed. `region` is only used for error
    /// reporting.
    pub fn validate(&self, region: usize) -> Result<()> {
        let mismatch = |line: usize, reason: &str| MergeError::IndexMismatch {
            region,
            line,
            reason: reason.to_string(),
        };

        let (Some(&old_last), Some(&new_first)) = (self.old_lines.last(), self.new_lines.first())
        else {
            return Err(mismatch(self.merge_line, "region has an empty side"));
        };
        for side in [&self.old_lines, &self.new_lines] {
            if let Some(pair) = side.windows(2).find(|pair| pair[0] >= pair[1]) {
                return Err(mismatch(pair[1], "indices are not strictly increasing"));
            }
        }
        if old_last + 1 != self.merge_line {
            return Err(mismatch(old_last, "old side does not end right before the separator"));
        }
        if self.merge_line + 1 != new_first {
            return Err(mismatch(
                new_first,
                "new side does not start right after the separator",
            ));
        }
        Ok(())
    }

    /// The same region with every index moved down by `n` lines.
    pub(crate) fn shifted_down(&self, n: usize) -> ConflictRegion {
        ConflictRegion {
            old_lines: self.old_lines.iter().map(|line| line - n).collect(),
            merge_line: self.merge_line - n,
            new_lines: self.new_lines.iter().map(|line| line - n).collect(),
        }
    }
}

/// Merged lines plus the conflict regions still pending in them.
///
/// Regions are kept in the order they appear in `merged_lines`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MergeState {
    pub(crate) merged_lines: Vec<String>,
    pub(crate) regions: Vec<ConflictRegion>,
}

impl MergeState {
    /// Wrap a caller-held snapshot. Nothing is checked here; `resolve`
    /// validates before touching anything.
    pub fn from_parts(merged_lines: Vec<String>, regions: Vec<ConflictRegion>) -> Self {
        MergeState {
            merged_lines,
            regions,
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<ConflictRegion>) {
        (self.merged_lines, self.regions)
    }

    pub fn lines(&self) -> &[String] {
        &self.merged_lines
    }

    pub fn regions(&self) -> &[ConflictRegion] {
        &self.regions
    }

    pub fn has_conflicts(&self) -> bool {
        !self.regions.is_empty()
    }

    /// Index of the pending region that owns `line`, if any.
    pub fn region_at_line(&self, line: usize) -> Option<usize> {
        self.regions.iter().position(|r| r.contains(line))
    }

    /// Check every region is well formed, in bounds and strictly after the
    /// previous one.
    pub fn validate(&self) -> Result<()> {
        let mut previous_end: Option<usize> = None;
        for (index, region) in self.regions.iter().enumerate() {
            region.validate(index)?;
            let span = region.span();
            if let Some(end) = previous_end {
                if *span.start() <= end {
                    return Err(MergeError::IndexMismatch {
                        region: index,
                        line: *span.start(),
                        reason: format!("overlaps or precedes the region ending at line {}", end),
                    });
                }
            }
            if *span.end() >= self.merged_lines.len() {
                return Err(MergeError::IndexMismatch {
                    region: index,
                    line: *span.end(),
                    reason: format!("past the end of {} merged lines", self.merged_lines.len()),
                });
            }
            previous_end = Some(*span.end());
        }
        Ok(())
    }

    /// Append a line and return its index.
    fn push_line(&mut self, line: &str) -> usize {
        self.merged_lines.push(line.to_string());
        self.merged_lines.len() - 1
    }

    fn emit(mut self, hunk: Hunk<'_, impl AsRef<str>>, markers: &Markers) -> Self {
        match hunk {
            Hunk::Unchanged(lines) => {
                for line in lines {
                    self.push_line(line.as_ref());
                }
            }
            Hunk::Change { removed, added } => {
                let mut old_lines = vec![self.push_line(&markers.old)];
                old_lines.extend(removed.iter().map(|line| self.push_line(line.as_ref())));
                let merge_line = self.push_line(&markers.separator);
                let mut new_lines: Vec<usize> =
                    added.iter().map(|line| self.push_line(line.as_ref())).collect();
                new_lines.push(self.push_line(&markers.new));

                trace!(
                    region = self.regions.len(),
                    removed = removed.len(),
                    added = added.len(),
                    merge_line,
                    "emitted conflict region"
                );
                self.regions.push(ConflictRegion {
                    old_lines,
                    merge_line,
                    new_lines,
                });
            }
        }
        self
    }
}

/// One step of the build pass: unchanged lines, or a removal and/or an
/// insertion at the same location.
enum Hunk<'a, T> {
    Unchanged(&'a [T]),
    Change { removed: &'a [T], added: &'a [T] },
}

/// Group runs into hunks, pairing each removed run with the added run that
/// immediately follows it.
///
/// Rejects run lists that break the differ's contract: empty runs, two runs
/// of the same kind back to back, or an added run directly before a removed
/// run.
fn pair_runs<'a, T>(runs: &[EditRun<'a, T>]) -> Result<Vec<Hunk<'a, T>>> {
    let malformed = |index: usize, reason: &str| MergeError::MalformedRunSequence {
        index,
        reason: reason.to_string(),
    };

    for (index, run) in runs.iter().enumerate() {
        if run.is_empty() {
            return Err(malformed(index, "empty run"));
        }
        if let Some(next) = runs.get(index + 1) {
            if next.kind == run.kind {
                return Err(malformed(index + 1, "two runs of the same kind back to back"));
            }
            if run.kind == RunKind::Added && next.kind == RunKind::Removed {
                return Err(malformed(index + 1, "removed run follows an added run"));
            }
        }
    }

    let mut hunks = vec![];
    let mut i = 0;
    while i < runs.len() {
        let run = &runs[i];
        match run.kind {
            RunKind::Equal => {
                hunks.push(Hunk::Unchanged(run.lines));
                i += 1;
            }
            RunKind::Removed => match runs.get(i + 1) {
                Some(next) if next.kind == RunKind::Added => {
                    hunks.push(Hunk::Change {
                        removed: run.lines,
                        added: next.lines,
                    });
                    i += 2;
                }
                _ => {
                    hunks.push(Hunk::Change {
                        removed: run.lines,
                        added: &[],
                    });
                    i += 1;
                }
            },
            RunKind::Added => {
                hunks.push(Hunk::Change {
                    removed: &[],
                    added: run.lines,
                });
                i += 1;
            }
        }
    }
    Ok(hunks)
}

/// Diff-and-merge with configurable markers and matching algorithm.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    markers: Markers,
    algorithm: DiffAlgorithm,
}

impl Merger {
    pub fn new() -> Self {
        Merger::default()
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn algorithm(&self) -> DiffAlgorithm {
        self.algorithm
    }

    /// Diff `original` against `candidate` and render the result.
    pub fn merge<A: AsRef<str>, B: AsRef<str>>(
        &self,
        original: &[A],
        candidate: &[B],
    ) -> Result<MergeState> {
        let original: Vec<&str> = original.iter().map(AsRef::as_ref).collect();
        let candidate: Vec<&str> = candidate.iter().map(AsRef::as_ref).collect();
        let runs = diff_with(self.algorithm, &original, &candidate);
        self.merge_runs(&runs)
    }

    /// Render an already computed edit script.
    ///
    /// Where a removed run and an added run describe the same location, the
    /// removed run must come first; the two become a single region.
    pub fn merge_runs<T: AsRef<str>>(&self, runs: &[EditRun<'_, T>]) -> Result<MergeState> {
        let hunks = pair_runs(runs)?;
        let state = hunks
            .into_iter()
            .fold(MergeState::default(), |state, hunk| {
                state.emit(hunk, &self.markers)
            });

        debug!(
            runs = runs.len(),
            regions = state.regions.len(),
            lines = state.merged_lines.len(),
            "merged edit script"
        );
        Ok(state)
    }
}

/// Diff and merge with the default markers and algorithm.
pub fn merge<A: AsRef<str>, B: AsRef<str>>(original: &[A], candidate: &[B]) -> Result<MergeState> {
    Merger::default().merge(original, candidate)
}

/// Render an edit script with the default markers.
pub fn merge_runs<T: AsRef<str>>(runs: &[EditRun<'_, T>]) -> Result<MergeState> {
    Merger::default().merge_runs(runs)
}
