//! Test utilities for Dockyard unit tests.
//!
//! Builders for component graphs so planner tests can describe a
//! dependency shape in one line.

use crate::builder::errors::PlanError;
use crate::builder::graph::ComponentGraph;
use crate::builder::plan::PlannedGraph;
use crate::builder::toolchain::ToolchainSelector;
use crate::core::component::Component;

/// Build a graph from `(name, deps)` pairs. Every component gets a single
/// source `<name>.c`.
pub fn graph_of(shape: &[(&str, &[&str])]) -> Result<ComponentGraph, PlanError> {
    let components = shape
        .iter()
        .map(|(name, deps)| {
            Component::new(*name)
                .with_sources([format!("{}.c", name)])
                .with_deps(deps.iter().copied())
        })
        .collect();

    planned(components)
}

/// Build a graph from `(name, sources, deps)` triples.
pub fn graph_with_sources(shape: &[(&str, &[&str], &[&str])]) -> Result<ComponentGraph, PlanError> {
    let components = shape
        .iter()
        .map(|(name, sources, deps)| {
            Component::new(*name)
                .with_sources(sources.iter().copied())
                .with_deps(deps.iter().copied())
        })
        .collect();

    planned(components)
}

fn planned(components: Vec<Component>) -> Result<ComponentGraph, PlanError> {
    PlannedGraph::new(components, &ToolchainSelector::default()).map(|p| p.graph)
}
