//! Resolution pass: drop one conflict region's unwanted lines and renumber
//! the regions after it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{MergeError, Result};
use crate::merge::{ConflictRegion, MergeState};

/// The side of a conflict region that is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Old,
    New,
}

impl ConflictRegion {
    /// Lines to delete when keeping `side`: all of the other side,
    /// marker included.
    pub fn lines_to_delete(&self, side: Side) -> Vec<usize> {
        match side {
            Side::Old => self.new_lines.clone(),
            Side::New => self.old_lines.clone(),
        }
    }
}

impl MergeState {
    /// Resolve region `index` by deleting `lines_to_delete` along with the
    /// region's separator line.
    ///
    /// Every index in `lines_to_delete` must belong to the region; repeats
    /// are ignored. Regions after `index` are shifted down by the number of
    /// lines removed. An empty `lines_to_delete` keeps both sides.
    pub fn resolve(&self, index: usize, lines_to_delete: &[usize]) -> Result<MergeState> {
        let Some(region) = self.regions.get(index) else {
            return Err(MergeError::InvalidRegion {
                index,
                count: self.regions.len(),
            });
        };
        self.validate()?;

        if let Some(&line) = lines_to_delete.iter().find(|&&line| !region.contains(line)) {
            return Err(MergeError::IndexMismatch {
                region: index,
                line,
                reason: "line does not belong to the region".to_string(),
            });
        }

        let deleted: BTreeSet<usize> = lines_to_delete
            .iter()
            .copied()
            .chain(std::iter::once(region.merge_line))
            .collect();
        let removed = deleted.len();

        let merged_lines = self
            .merged_lines
            .iter()
            .enumerate()
            .filter(|(line, _)| !deleted.contains(line))
            .map(|(_, text)| text.clone())
            .collect();

        let regions = self
            .regions
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(i, r)| {
                if i > index {
                    r.shifted_down(removed)
                } else {
                    r.clone()
                }
            })
            .collect();

        debug!(
            region = index,
            removed,
            remaining = self.regions.len() - 1,
            "resolved conflict region"
        );
        Ok(MergeState::from_parts(merged_lines, regions))
    }

    /// Resolve region `index`, keeping `side`.
    pub fn resolve_side(&self, index: usize, side: Side) -> Result<MergeState> {
        let region = self.regions.get(index).ok_or(MergeError::InvalidRegion {
            index,
            count: self.regions.len(),
        })?;
        self.resolve(index, &region.lines_to_delete(side))
    }

    /// Resolve every pending region, front to back, keeping `side`.
    pub fn resolve_all(&self, side: Side) -> Result<MergeState> {
        let mut state = self.clone();
        while state.has_conflicts() {
            state = state.resolve_side(0, side)?;
        }
        Ok(state)
    }
}

/// Resolve region `index` of `state`; see [`MergeState::resolve`].
pub fn resolve(state: &MergeState, index: usize, lines_to_delete: &[usize]) -> Result<MergeState> {
    state.resolve(index, lines_to_delete)
}
