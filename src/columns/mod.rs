//! Header management for a multi-column control: the full header set, its
//! permutation, and the solver for what is on screen.

mod config;
mod core;

pub use self::config::ColumnSetConfig;
pub use self::core::ColumnSet;
