mod types;

pub use types::{LayoutError, Result};
