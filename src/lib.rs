//! Column-header layout engine for multi-column tree and grid controls.
//!
//! Headers are either fixed-width or proportional. [`ColumnBounds`] turns the
//! displayed headers and a control width into pixel bounds and runs splitter
//! drags; [`ColumnSet`] keeps the full header set, hides and reorders columns
//! through a [`Permutation`], and folds on-screen edits back into the full set.
//!
//! The modules follow the same orchestrator pattern throughout: each
//! `mod.rs` re-exports from a private `core` module.

pub mod columns;
pub mod error;
pub mod geometry;
pub mod header;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod permutation;
pub mod reconcile;

pub use columns::{ColumnSet, ColumnSetConfig};
pub use error::{LayoutError, Result};
pub use geometry::{ColumnExtent, ColumnHit};
pub use header::{ColumnHeader, ColumnHeaderStyles, MIN_PIXEL_WIDTH, PERCENTAGE_EPSILON};
pub use layout::{AdjustmentLimits, ColumnBounds};
pub use logging::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
    WriterSink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use permutation::{ColumnPermutation, Permutation, PermutationError};
pub use reconcile::PermutedHeaders;
