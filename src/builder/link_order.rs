//! Link order resolution.
//!
//! Linkers scan the link line left to right and only pull in definitions for
//! symbols that are already undefined, so a component must appear before the
//! components it depends on. The resolver computes that order for one link
//! target:
//!
//! 1. Collect the closure of the target's required components.
//! 2. Number the closure in forward discovery order (required list order,
//!    then dependency declaration order). Members of a cycle are listed in
//!    this order.
//! 3. Linearize the strongly connected components of the closure by reverse
//!    post-order, visiting roots and edges in reverse so the required list's
//!    order survives as the tie-break.
//! 4. Expand each strongly connected component. Under `single-pass` a cycle
//!    is an error; under `repeat-cycles` members `m1..mk` are emitted as
//!    `m1..mk m1..m(k-1)`, so every edge inside the cycle points forward
//!    at least once.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::builder::errors::{PlanError, Reference};
use crate::builder::graph::ComponentGraph;
use crate::core::target::{LinkPolicy, LinkTarget};

/// One object group placed on a link line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Component owning the objects
    pub component: String,
    /// Objects of the component, in source order
    pub objects: Vec<PathBuf>,
    /// Listed in the target's `requires`
    pub explicit: bool,
    /// Components in the closure that depend on this one
    pub required_by: Vec<String>,
    /// This is a repeated placement emitted to close a cycle
    pub repeat: bool,
}

/// The resolved link line of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub artifact: String,
    pub policy: LinkPolicy,
    pub entries: Vec<LinkEntry>,
}

impl ResolvedLink {
    /// All objects in link-line order.
    pub fn objects(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .flat_map(|e| e.objects.iter().cloned())
            .collect()
    }

    /// Component names in link-line order, repeats included.
    pub fn components(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.component.as_str()).collect()
    }
}

/// Computes link orders over a component graph.
#[derive(Debug, Clone)]
pub struct LinkOrderResolver<'a> {
    graph: &'a ComponentGraph,
    default_policy: LinkPolicy,
}

impl<'a> LinkOrderResolver<'a> {
    pub fn new(graph: &'a ComponentGraph, default_policy: LinkPolicy) -> Self {
        LinkOrderResolver {
            graph,
            default_policy,
        }
    }

    /// Indices of the target's required components, first occurrence kept.
    pub fn roots(&self, target: &LinkTarget) -> Result<Vec<usize>, PlanError> {
        let mut roots = Vec::new();
        for name in &target.requires {
            let i = self
                .graph
                .index_of(name)
                .ok_or_else(|| PlanError::UnknownComponent {
                    name: name.clone(),
                    referenced_by: Reference::LinkTarget {
                        artifact: target.artifact.clone(),
                    },
                })?;
            if !roots.contains(&i) {
                roots.push(i);
            }
        }
        Ok(roots)
    }

    /// Resolve the link order of a target.
    pub fn resolve_link_order(&self, target: &LinkTarget) -> Result<ResolvedLink, PlanError> {
        let policy = target.effective_policy(self.default_policy);
        let roots = self.roots(target)?;
        if roots.is_empty() {
            return Err(PlanError::EmptyLinkTarget {
                target: target.artifact.clone(),
            });
        }

        let closure = self.graph.closure(&roots);
        let discovery = self.discovery_order(&roots);

        if policy == LinkPolicy::SinglePass {
            if let Some(&i) = closure.iter().find(|&&i| self.graph.in_cycle(i)) {
                return Err(PlanError::UnresolvableCycle {
                    target: target.artifact.clone(),
                    cycle: self.cycle_path(i),
                });
            }
        }

        // Reverse post-order over strongly connected components.
        let mut visited = vec![false; self.graph.len()];
        let mut post = Vec::new();
        for &root in roots.iter().rev() {
            self.visit(self.graph.scc_id(root), &discovery, &mut visited, &mut post);
        }
        post.reverse();

        let mut entries = Vec::new();
        for members in post {
            self.push_entries(&members, &roots, &closure, false, &mut entries);
            if members.len() > 1 {
                let repeat = &members[..members.len() - 1];
                self.push_entries(repeat, &roots, &closure, true, &mut entries);
            }
        }

        if entries.is_empty() {
            return Err(PlanError::EmptyLinkTarget {
                target: target.artifact.clone(),
            });
        }

        tracing::debug!(
            "link order for {} ({}): {}",
            target.artifact,
            policy,
            entries
                .iter()
                .map(|e| e.component.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        );

        Ok(ResolvedLink {
            artifact: target.artifact.clone(),
            policy,
            entries,
        })
    }

    /// Forward pre-order discovery index of each reachable component.
    fn discovery_order(&self, roots: &[usize]) -> Vec<Option<usize>> {
        let mut order = vec![None; self.graph.len()];
        let mut next = 0;
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();

        while let Some(i) = stack.pop() {
            if order[i].is_some() {
                continue;
            }
            order[i] = Some(next);
            next += 1;
            for dep in self.graph.deps_at(i).into_iter().rev() {
                if order[dep].is_none() {
                    stack.push(dep);
                }
            }
        }

        order
    }

    fn visit(
        &self,
        scc: usize,
        discovery: &[Option<usize>],
        visited: &mut [bool],
        post: &mut Vec<Vec<usize>>,
    ) {
        if visited[scc] {
            return;
        }
        visited[scc] = true;

        let mut members: Vec<usize> = self.graph.scc_members(scc).to_vec();
        members.sort_by_key(|&m| discovery[m]);

        for &member in members.iter().rev() {
            for dep in self.graph.deps_at(member).into_iter().rev() {
                let dep_scc = self.graph.scc_id(dep);
                if dep_scc != scc {
                    self.visit(dep_scc, discovery, visited, post);
                }
            }
        }

        post.push(members);
    }

    fn push_entries(
        &self,
        members: &[usize],
        roots: &[usize],
        closure: &[usize],
        repeat: bool,
        entries: &mut Vec<LinkEntry>,
    ) {
        for &member in members {
            let group = self.graph.group_at(member);
            if group.is_empty() {
                continue;
            }

            let name = self.graph.component_at(member).name();
            let required_by = closure
                .iter()
                .filter(|&&caller| caller != member)
                .map(|&caller| self.graph.component_at(caller))
                .filter(|caller| caller.deps().iter().any(|d| d == name))
                .map(|caller| caller.name().to_string())
                .collect();

            entries.push(LinkEntry {
                component: name.to_string(),
                objects: group.objects.clone(),
                explicit: roots.contains(&member),
                required_by,
                repeat,
            });
        }
    }

    /// A dependency path from component `start` back to itself, following
    /// edges inside its strongly connected component.
    fn cycle_path(&self, start: usize) -> Vec<String> {
        let scc = self.graph.scc_id(start);
        let mut path = vec![start];
        let mut on_path = vec![false; self.graph.len()];
        on_path[start] = true;

        if !self.close_cycle(start, scc, &mut path, &mut on_path) {
            // Unreachable for a strongly connected component; report members.
            path = self.graph.scc_members(scc).to_vec();
            path.push(start);
        }

        path.iter()
            .map(|&i| self.graph.component_at(i).name().to_string())
            .collect()
    }

    fn close_cycle(
        &self,
        start: usize,
        scc: usize,
        path: &mut Vec<usize>,
        on_path: &mut [bool],
    ) -> bool {
        let Some(&current) = path.last() else {
            return false;
        };

        for dep in self.graph.deps_at(current) {
            if dep == start && path.len() > 1 {
                path.push(start);
                return true;
            }
            if on_path[dep] || self.graph.scc_id(dep) != scc {
                continue;
            }
            on_path[dep] = true;
            path.push(dep);
            if self.close_cycle(start, scc, path, on_path) {
                return true;
            }
            path.pop();
        }

        false
    }
}
