use thiserror::Error;

/// Errors reported by the merge and resolution passes.
///
/// Every failing call leaves its input untouched; there is no partial
/// renumbering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// The run list handed to the build pass has a shape it cannot classify,
    /// e.g. an added run directly before a removed run.
    #[error("malformed run sequence at run {index}: {reason}")]
    MalformedRunSequence { index: usize, reason: String },

    /// The region index is not in range of the current region list.
    #[error("region {index} out of range ({count} regions pending)")]
    InvalidRegion { index: usize, count: usize },

    /// A line index does not agree with what the region has recorded.
    #[error("region {region}: line {line}: {reason}")]
    IndexMismatch {
        region: usize,
        line: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, MergeError>;
