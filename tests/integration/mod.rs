//! Integration tests for rollgraph
//!
//! These load topologies and pipelines from disk and check the assembled graph,
//! its DOT rendering and the CLI commands end to end.

pub mod commands;
pub mod failures;
pub mod graph_assembly;
pub mod helpers;
pub mod loading;
