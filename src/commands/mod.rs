//! CLI command implementations
//!
//! Each command resolves its inputs from disk, calls into the library and prints
//! a summary. Errors are returned as `anyhow` errors for `main` to report.

pub mod graph;
pub mod validate;
