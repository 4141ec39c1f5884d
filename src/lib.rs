pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod topology;

pub use error::{GraphError, GraphResult, PipelineError, ServiceNotFoundError, TopologyError};
pub use graph::{Graph, Identifier, Node};
