//! Cycle detection for the assembled graph

use std::collections::{HashMap, HashSet};

use crate::error::{GraphError, GraphResult};

use super::identifier::{Identifier, Node};

/// Depth-first search along children, started from every node.
///
/// The graph has no single root, so every node is a starting point. Within one
/// start, nodes whose descendants were fully explored are not explored again.
/// Returns the path from the start node up to and including the node that closed
/// the cycle.
pub(super) fn find_cycle(nodes: &[Node]) -> GraphResult<Option<Vec<Identifier>>> {
    let index: HashMap<&Identifier, &Node> = nodes.iter().map(|n| (&n.identifier, n)).collect();

    for node in nodes {
        let mut path = vec![node.identifier.clone()];
        let mut finished = HashSet::new();
        if let Some(cycle) = traverse(node, &index, &mut path, &mut finished)? {
            return Ok(Some(cycle));
        }
    }
    Ok(None)
}

fn traverse<'a>(
    node: &'a Node,
    index: &HashMap<&'a Identifier, &'a Node>,
    path: &mut Vec<Identifier>,
    finished: &mut HashSet<&'a Identifier>,
) -> GraphResult<Option<Vec<Identifier>>> {
    for child in &node.children {
        if path.contains(child) {
            let mut cycle = path.clone();
            cycle.push(child.clone());
            return Ok(Some(cycle));
        }
        if finished.contains(child) {
            continue;
        }

        let child_node = index
            .get(child)
            .copied()
            .ok_or_else(|| GraphError::MissingNode {
                identifier: child.clone(),
            })?;

        path.push(child.clone());
        let found = traverse(child_node, index, path, finished)?;
        path.pop();
        if found.is_some() {
            return Ok(found);
        }
    }

    finished.insert(&node.identifier);
    Ok(None)
}
