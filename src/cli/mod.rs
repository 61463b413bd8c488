//! Command-line interface for ghlink.

mod commands;
pub mod helpers;
pub mod icons;

pub use commands::{is_verbose, run};
