//! Native/display column mapping used when columns are hidden or reordered.

mod core;

pub use self::core::{ColumnPermutation, Permutation, PermutationError};
