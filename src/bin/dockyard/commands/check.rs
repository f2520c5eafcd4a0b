//! `dockyard check` command
//!
//! Builds the whole plan without emitting it.

use std::path::Path;

use anyhow::Result;

use super::Project;
use crate::cli::CheckArgs;
use dockyard::builder::{BuildPlan, PlanOptions};
use dockyard::util::diagnostic::{emit, Diagnostic};
use dockyard::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>, args: CheckArgs) -> Result<()> {
    let project = Project::load(ctx, manifest, args.policy)?;
    let options = PlanOptions {
        config: project.config.clone(),
        targets: None,
    };
    let plan = BuildPlan::from_manifest(&project.manifest, &options)?;

    let planned = project.planned_graph()?;
    for cycle in planned.graph.cycles() {
        emit(
            &Diagnostic::warning(format!(
                "components form a dependency cycle: {}",
                cycle.join(", ")
            ))
            .with_context("only link targets using `repeat-cycles` can require these components"),
            ctx.color(),
        );
    }

    println!(
        "{}: {} component(s), {} compile step(s), {} link target(s)",
        project.manifest.project.name,
        project.manifest.components.len(),
        plan.compile_count(),
        plan.link_count()
    );
    for link in plan.link_steps() {
        println!("  {} ({} objects)", link.artifact, link.objects.len());
    }

    Ok(())
}
