use thiserror::Error;

use crate::permutation::PermutationError;

/// Unified result type for the column layout crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Configuration errors surfaced when headers or permutations are assigned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error(
        "percentage-based headers must ascend: column {column} has {percentage}, previous was {previous}"
    )]
    PercentagesNotAscending {
        column: usize,
        percentage: f32,
        previous: f32,
    },
    #[error("the last percentage-based header (column {column}) must end at 1.0, found {percentage}")]
    LastPercentageInvalid { column: usize, percentage: f32 },
    #[error("percentage {percentage} for column {column} is outside 0..=1")]
    PercentageOutOfRange { column: usize, percentage: f32 },
    #[error("expected {expected} column headers, got {actual}")]
    HeaderCountMismatch { expected: usize, actual: usize },
    #[error("permutation covers {permutation} columns but {headers} headers are set")]
    PermutationMismatch { permutation: usize, headers: usize },
    #[error("column permutation error: {0}")]
    Permutation(#[from] PermutationError),
}
