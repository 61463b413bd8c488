//! Shared utility functions.
//!
//! - `format`: Human-readable formatting (sizes, dates, truncation)

mod format;

pub use format::{format_date, format_size, truncate};
