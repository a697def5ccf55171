//! Utility functions.

pub mod format;

pub use format::{format_delimited, format_metric};
