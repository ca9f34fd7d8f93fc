//! Translation between the full column set and the displayed subset.
//!
//! The forward direction builds what the solver lays out; the reverse folds
//! whatever the user changed on screen back into the full set so hidden
//! columns keep sensible settings for when they are shown again.

mod core;

pub use self::core::{
    PermutedHeaders, auto_fill_headers, even_percentages, find_auto_fill_index, permute_headers,
    reverse_integrate, snap_last_percentage, validate_percentages,
};
