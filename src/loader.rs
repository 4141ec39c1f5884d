//! Reading a topology and the pipelines it references from disk

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::pipeline::Pipeline;
use crate::topology::{Service, Topology};

/// A topology together with every pipeline it points at
#[derive(Debug, Clone)]
pub struct Rollout {
    pub topology: Topology,
    /// Pipelines keyed by the service group of the service that references them
    pub pipelines: HashMap<String, Pipeline>,
}

impl Rollout {
    /// Load `topology_path` and every `pipelinePath` in it.
    ///
    /// Pipeline paths are relative to the topology file. Services without a
    /// pipeline path are skipped here and reported when a graph needs them.
    pub fn load(topology_path: &Path) -> Result<Self> {
        let topology = Topology::load(topology_path)?;
        let base = topology_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut pipelines = HashMap::new();
        for root in &topology.services {
            load_pipelines(root, &base, &mut pipelines)?;
        }
        debug!(
            topology = %topology_path.display(),
            pipelines = pipelines.len(),
            "loaded rollout"
        );

        Ok(Self {
            topology,
            pipelines,
        })
    }

    /// Service groups in the topology that have no pipeline
    pub fn services_without_pipeline(&self) -> Vec<String> {
        let mut missing = Vec::new();
        let mut stack: Vec<&Service> = self.topology.services.iter().collect();
        while let Some(service) = stack.pop() {
            if !self.pipelines.contains_key(&service.service_group) {
                missing.push(service.service_group.clone());
            }
            stack.extend(&service.children);
        }
        missing.sort();
        missing
    }
}

fn load_pipelines(
    service: &Service,
    base: &Path,
    pipelines: &mut HashMap<String, Pipeline>,
) -> Result<()> {
    if let Some(relative) = &service.pipeline_path {
        let path: PathBuf = base.join(relative);
        let pipeline = Pipeline::load(&path).with_context(|| {
            format!("Failed to load pipeline for service {}", service.service_group)
        })?;
        debug!(
            service_group = service.service_group.as_str(),
            path = %path.display(),
            resource_groups = pipeline.resource_groups.len(),
            "loaded pipeline"
        );
        pipelines.insert(service.service_group.clone(), pipeline);
    }

    for child in &service.children {
        load_pipelines(child, base, pipelines)?;
    }
    Ok(())
}
