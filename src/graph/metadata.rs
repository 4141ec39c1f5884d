//! Resource group metadata comparison across services
//!
//! Two services may deploy into the same named resource group only when they
//! describe it identically. Execution constraint lists are compared position by
//! position, but the clouds, environments and regions inside each constraint are
//! compared as sets.

use std::collections::BTreeSet;

use crate::pipeline::{ExecutionConstraint, ResourceGroupMeta};

pub(super) fn resource_group_meta_equal(a: &ResourceGroupMeta, b: &ResourceGroupMeta) -> bool {
    a.name == b.name
        && a.resource_group == b.resource_group
        && a.subscription == b.subscription
        && a.execution_constraints.len() == b.execution_constraints.len()
        && a.execution_constraints
            .iter()
            .zip(&b.execution_constraints)
            .all(|(x, y)| constraint_equal(x, y))
}

fn constraint_equal(a: &ExecutionConstraint, b: &ExecutionConstraint) -> bool {
    a.singleton == b.singleton
        && as_set(&a.clouds) == as_set(&b.clouds)
        && as_set(&a.environments) == as_set(&b.environments)
        && as_set(&a.regions) == as_set(&b.regions)
}

fn as_set(values: &[String]) -> BTreeSet<&str> {
    values.iter().map(String::as_str).collect()
}

/// Render the fields that differ, `-` for the recorded definition and `+` for the
/// incoming one.
pub(super) fn resource_group_meta_diff(
    existing: &ResourceGroupMeta,
    incoming: &ResourceGroupMeta,
) -> String {
    let mut lines = vec!["  ResourceGroupMeta{".to_string()];

    push_field(&mut lines, "name", &existing.name, &incoming.name);
    push_field(
        &mut lines,
        "resourceGroup",
        &existing.resource_group,
        &incoming.resource_group,
    );
    push_field(
        &mut lines,
        "subscription",
        &existing.subscription,
        &incoming.subscription,
    );

    let (old, new) = (&existing.execution_constraints, &incoming.execution_constraints);
    if old.len() != new.len() {
        lines.push(format!("-   executionConstraints: {} entries", old.len()));
        lines.push(format!("+   executionConstraints: {} entries", new.len()));
    }
    for (i, (x, y)) in old.iter().zip(new).enumerate() {
        if x.singleton != y.singleton {
            lines.push(format!("-   executionConstraints[{i}].singleton: {}", x.singleton));
            lines.push(format!("+   executionConstraints[{i}].singleton: {}", y.singleton));
        }
        for (field, a, b) in [
            ("clouds", &x.clouds, &y.clouds),
            ("environments", &x.environments, &y.environments),
            ("regions", &x.regions, &y.regions),
        ] {
            let (a, b) = (as_set(a), as_set(b));
            if a != b {
                lines.push(format!("-   executionConstraints[{i}].{field}: {}", render_set(&a)));
                lines.push(format!("+   executionConstraints[{i}].{field}: {}", render_set(&b)));
            }
        }
    }

    lines.push("  }".to_string());
    lines.join("\n")
}

fn push_field(lines: &mut Vec<String>, field: &str, old: &str, new: &str) {
    if old != new {
        lines.push(format!("-   {field}: {old:?},"));
        lines.push(format!("+   {field}: {new:?},"));
    }
}

fn render_set(values: &BTreeSet<&str>) -> String {
    format!("[{}]", values.iter().copied().collect::<Vec<_>>().join(", "))
}
