//! The component graph.
//!
//! Once created, a ComponentGraph is read-only: components, their object
//! groups and the dependency edges between them are fixed for the rest of
//! plan construction.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::builder::errors::{PlanError, Reference};
use crate::core::component::{Component, ObjectGroup};

/// Components, their object groups and dependency edges.
#[derive(Debug, Clone)]
pub struct ComponentGraph {
    /// Components in declaration order
    components: Vec<Component>,

    /// Object group of each component (same index)
    groups: Vec<ObjectGroup>,

    /// Map from component name to index
    index: HashMap<String, usize>,

    /// Dependency graph; node `i` is component `i`
    graph: DiGraph<usize, ()>,

    /// Strongly connected component id of each component
    scc_of: Vec<usize>,

    /// Members of each strongly connected component, in declaration order
    sccs: Vec<Vec<usize>>,
}

impl ComponentGraph {
    /// Build the graph from planned components.
    ///
    /// Fails if a name is declared twice or an edge names a component that
    /// is not part of the graph.
    pub fn new(
        entries: impl IntoIterator<Item = (Component, ObjectGroup)>,
    ) -> Result<Self, PlanError> {
        let mut components = Vec::new();
        let mut groups = Vec::new();
        let mut index = HashMap::new();
        let mut graph = DiGraph::new();

        for (component, group) in entries {
            let i = components.len();
            if index.insert(component.name().to_string(), i).is_some() {
                return Err(PlanError::DuplicateComponent {
                    name: component.name().to_string(),
                });
            }
            graph.add_node(i);
            components.push(component);
            groups.push(group);
        }

        for (from, component) in components.iter().enumerate() {
            for dep in component.deps() {
                let to = *index.get(dep).ok_or_else(|| PlanError::UnknownComponent {
                    name: dep.clone(),
                    referenced_by: Reference::Dependency {
                        from: component.name().to_string(),
                    },
                })?;

                let (a, b) = (NodeIndex::new(from), NodeIndex::new(to));
                if !graph.contains_edge(a, b) {
                    graph.add_edge(a, b, ());
                }
            }
        }

        let mut scc_of = vec![0; components.len()];
        let mut sccs: Vec<Vec<usize>> = tarjan_scc(&graph)
            .into_iter()
            .map(|scc| {
                let mut members: Vec<usize> = scc.into_iter().map(|n| n.index()).collect();
                members.sort_unstable();
                members
            })
            .collect();
        // tarjan_scc order depends on graph internals; number SCCs by their
        // first declared member so ids are stable.
        sccs.sort_by_key(|members| members[0]);
        for (id, members) in sccs.iter().enumerate() {
            for &member in members {
                scc_of[member] = id;
            }
        }

        Ok(ComponentGraph {
            components,
            groups,
            index,
            graph,
            scc_of,
            sccs,
        })
    }

    /// Components in declaration order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declaration index of a component.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.index_of(name).map(|i| &self.components[i])
    }

    pub(crate) fn component_at(&self, i: usize) -> &Component {
        &self.components[i]
    }

    /// The object group of a component.
    pub fn object_group_of(&self, name: &str) -> Option<&ObjectGroup> {
        self.index_of(name).map(|i| &self.groups[i])
    }

    pub(crate) fn group_at(&self, i: usize) -> &ObjectGroup {
        &self.groups[i]
    }

    /// Names of the components `name` depends on, in declaration order.
    pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
        self.component(name).map(Component::deps)
    }

    /// Dependency indices of component `i`, in declaration order.
    pub(crate) fn deps_at(&self, i: usize) -> Vec<usize> {
        self.components[i]
            .deps()
            .iter()
            .filter_map(|d| self.index_of(d))
            .collect()
    }

    /// Strongly connected component id of component `i`.
    pub(crate) fn scc_id(&self, i: usize) -> usize {
        self.scc_of[i]
    }

    /// Whether component `i` takes part in a cycle with other components.
    /// Self-edges do not count.
    pub fn in_cycle(&self, i: usize) -> bool {
        self.sccs[self.scc_of[i]].len() > 1
    }

    /// Members of the strongly connected component `id`.
    pub(crate) fn scc_members(&self, id: usize) -> &[usize] {
        &self.sccs[id]
    }

    /// Groups of mutually dependent components, each in declaration order.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        self.sccs
            .iter()
            .filter(|members| members.len() > 1)
            .map(|members| {
                members
                    .iter()
                    .map(|&i| self.components[i].name().to_string())
                    .collect()
            })
            .collect()
    }

    /// Indices of every component reachable from `roots` (roots included),
    /// in declaration order.
    pub fn closure(&self, roots: &[usize]) -> Vec<usize> {
        let mut reached = vec![false; self.components.len()];
        let Some(&first) = roots.first() else {
            return Vec::new();
        };

        let mut dfs = Dfs::new(&self.graph, NodeIndex::new(first));
        for &root in roots {
            dfs.move_to(NodeIndex::new(root));
            while let Some(node) = dfs.next(&self.graph) {
                reached[node.index()] = true;
            }
        }

        reached
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| r.then_some(i))
            .collect()
    }
}
