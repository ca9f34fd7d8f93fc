//! Column header descriptors.
//!
//! A [`ColumnHeader`] carries the display fields of a column together with the
//! two numbers the layout engine consumes: the cumulative percentage and the
//! fixed/minimum pixel width.

mod core;

pub use self::core::{ColumnHeader, ColumnHeaderStyles, MIN_PIXEL_WIDTH, PERCENTAGE_EPSILON};
