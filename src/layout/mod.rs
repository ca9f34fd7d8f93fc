//! Pixel layout solver for the displayed column set.
//!
//! Callers import the solver from here; the threshold bookkeeping lives in the
//! private `core` module and the splitter-drag protocol in `adjust`.

mod adjust;
mod core;

pub use self::adjust::AdjustmentLimits;
pub use self::core::ColumnBounds;
