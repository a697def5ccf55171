//! CLI argument parsing and command dispatch.

pub mod args;
pub mod render;
pub mod serve;
pub mod url;

pub use args::{Cli, Commands};
