//! Graphviz DOT rendering
//!
//! See <https://graphviz.gitlab.io/doc/info/lang.html> for the format.

use std::collections::BTreeMap;

use crate::error::{GraphError, GraphResult};
use crate::pipeline::ValidationStep;

use super::identifier::{Identifier, Node};

const GRAPH_PREFIX: &str = "digraph regexp { \n fontname=\"Helvetica,Arial,sans-serif\"\n node [fontname=\"Helvetica,Arial,sans-serif\"]\n edge [fontname=\"Helvetica,Arial,sans-serif\"]\n";

const GRAPH_SUFFIX: &str = "}";

/// Number of leading organizational components dropped from service groups
const SERVICE_GROUP_PREFIX_PARTS: usize = 4;

/// Render nodes and service validation steps as a DOT digraph.
///
/// Edges are written from each node's children only; parent links are the same
/// edges seen from the other side.
pub fn marshal_dot(
    nodes: &[Node],
    validation_steps: &BTreeMap<Identifier, ValidationStep>,
) -> GraphResult<String> {
    let mut out = String::from(GRAPH_PREFIX);

    for node in nodes {
        let id = node_id(&node.identifier)?;
        let label = node_label(&node.identifier)?;
        out.push_str(&format!(" \"{id}\" [label=\"{label}\"];\n"));

        for child in &node.children {
            out.push_str(&format!(" \"{id}\" -> \"{}\";\n", node_id(child)?));
        }
    }

    for identifier in validation_steps.keys() {
        out.push_str(&format!(
            " \"serviceValidation\" -> \"{}\";\n",
            node_id(identifier)?
        ));
    }

    out.push_str(GRAPH_SUFFIX);
    Ok(out)
}

fn node_id(identifier: &Identifier) -> GraphResult<String> {
    Ok(format!(
        "{}_{}_{}",
        shorten_service_group(&identifier.service_group)?,
        identifier.resource_group,
        identifier.step
    ))
}

fn node_label(identifier: &Identifier) -> GraphResult<String> {
    Ok(format!(
        "{}/{}/{}",
        shorten_service_group(&identifier.service_group)?,
        identifier.resource_group,
        identifier.step
    ))
}

/// Drop the organizational prefix: `Microsoft.Azure.ARO.HCP.Foo.Bar` becomes `Foo.Bar`
pub fn shorten_service_group(service_group: &str) -> GraphResult<String> {
    let parts: Vec<&str> = service_group.split('.').collect();
    if parts.len() <= SERVICE_GROUP_PREFIX_PARTS {
        return Err(GraphError::invalid_service_group(service_group));
    }
    Ok(parts[SERVICE_GROUP_PREFIX_PARTS..].join("."))
}
