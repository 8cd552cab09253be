//! Line-level diff rendered as conflict regions.
//!
//! Given an original sequence of lines and a proposed replacement, [`merge`]
//! produces a single merged sequence where every change is shown as
//!
//! ```text
//! >>>>>>> OLD CODE
//! removed lines
//! =======
//! added lines
//! >>>>>>> NEW CODE
//! ```
//!
//! along with the line indices of each region. Regions are then resolved one
//! at a time with [`MergeState::resolve`], which drops the unwanted lines and
//! renumbers the regions that come after.
//!
//! ```
//! use merge_regions::{merge, Side};
//!
//! let state = merge(&["a", "b", "c"], &["a", "x", "c"]).unwrap();
//! assert_eq!(state.regions().len(), 1);
//!
//! let state = state.resolve_side(0, Side::New).unwrap();
//! assert_eq!(state.lines(), &["a", "x", ">>>>>>> NEW CODE", "c"]);
//! ```

pub mod annotate;
pub mod diff;
pub mod error;
pub mod merge;
pub mod resolve;

pub use annotate::LineRole;
pub use diff::{diff, diff_with, DiffAlgorithm, EditRun, RunKind};
pub use error::{MergeError, Result};
pub use merge::{merge, merge_runs, ConflictRegion, Markers, MergeState, Merger};
pub use resolve::{resolve, Side};
