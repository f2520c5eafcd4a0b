//! `dockyard tree` command

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Result};

use super::Project;
use crate::cli::TreeArgs;
use dockyard::builder::ComponentGraph;
use dockyard::util::diagnostic::suggestions;
use dockyard::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>, args: TreeArgs) -> Result<()> {
    let project = Project::load(ctx, manifest, None)?;
    let planned = project.planned_graph()?;
    let graph = &planned.graph;
    let max_depth = args.depth.unwrap_or(usize::MAX);

    match args.component {
        Some(name) => {
            let Some(root) = graph.index_of(&name) else {
                bail!(
                    "component `{}` not found\nhelp: {}",
                    name,
                    suggestions::CHECK_SPELLING
                );
            };
            let mut seen = HashSet::new();
            print_tree(graph, root, 0, max_depth, &mut seen, &mut Vec::new());
        }
        None => {
            for target in project.manifest.link_targets() {
                println!("{}", target.artifact);
                let mut seen = HashSet::new();
                for name in &target.requires {
                    match graph.index_of(name) {
                        Some(i) => print_tree(graph, i, 1, max_depth, &mut seen, &mut Vec::new()),
                        None => println!("├── {} (unknown)", name),
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_tree(
    graph: &ComponentGraph,
    node: usize,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<usize>,
    stack: &mut Vec<usize>,
) {
    if depth > max_depth {
        return;
    }

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };

    let name = graph.components()[node].name();

    // Back edge to a component still being printed
    if stack.contains(&node) {
        println!("{}{} (cycle)", prefix, name);
        return;
    }

    // Don't recurse into components already shown
    if !seen.insert(node) {
        println!("{}{} (*)", prefix, name);
        return;
    }

    println!("{}{}", prefix, name);

    stack.push(node);
    for dep in graph.components()[node].deps() {
        if let Some(i) = graph.index_of(dep) {
            print_tree(graph, i, depth + 1, max_depth, seen, stack);
        }
    }
    stack.pop();
}
