//! Service topology: the forest of services and the entrypoints that select
//! deployable sub-trees of it.

mod types;
mod validation;


pub use types::{Entrypoint, Service, Topology};
