//! Topology validation and lookup

use std::collections::{BTreeSet, HashSet};

use crate::error::{ServiceNotFoundError, TopologyError};

use super::types::{Service, Topology};

impl Topology {
    /// Validate the service forest and the entrypoints into it.
    ///
    /// Does not stop at the first problem: duplicate service groups and bad
    /// entrypoints are all collected and reported together.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut walker = Walker::default();
        for root in &self.services {
            walker.walk(root);
        }

        let mut problems = Vec::new();
        if !walker.duplicates.is_empty() {
            let duplicates: Vec<_> = walker.duplicates.iter().map(String::as_str).collect();
            problems.push(format!(
                "the following pipelines had duplicate entries: [{}]",
                duplicates.join(" ")
            ));
        }
        for entrypoint in &self.entrypoints {
            if entrypoint.identifier.is_empty() {
                problems.push("entrypoint identifier cannot be empty".to_string());
            }
            if !walker.seen.contains(&entrypoint.identifier) {
                problems.push(format!(
                    "entrypoint {} was not found in the dependency tree",
                    entrypoint.identifier
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(TopologyError::Invalid { problems })
        }
    }

    /// Find the sub-tree rooted at `service_group`.
    ///
    /// Roots are searched in order, each depth-first, and the first match wins.
    pub fn lookup(&self, service_group: &str) -> Result<&Service, ServiceNotFoundError> {
        self.services
            .iter()
            .find_map(|root| find(root, service_group))
            .ok_or_else(|| ServiceNotFoundError {
                service_group: service_group.to_string(),
            })
    }
}

#[derive(Default)]
struct Walker {
    seen: HashSet<String>,
    duplicates: BTreeSet<String>,
}

impl Walker {
    fn walk(&mut self, service: &Service) {
        if !self.seen.insert(service.service_group.clone()) {
            self.duplicates.insert(service.service_group.clone());
        }
        for child in &service.children {
            self.walk(child);
        }
    }
}

fn find<'a>(root: &'a Service, service_group: &str) -> Option<&'a Service> {
    if root.service_group == service_group {
        return Some(root);
    }
    root.children
        .iter()
        .find_map(|child| find(child, service_group))
}
