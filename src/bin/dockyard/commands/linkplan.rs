//! `dockyard linkplan` command

use std::path::Path;

use anyhow::Result;

use super::Project;
use crate::cli::LinkplanArgs;
use dockyard::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>, args: LinkplanArgs) -> Result<()> {
    let project = Project::load(ctx, manifest, args.policy)?;
    let target = project.link_target(&args.target)?;
    let planned = project.planned_graph()?;

    let resolved = planned
        .resolver(project.config.policy())
        .resolve_link_order(&target)?;

    println!("Link order for '{}' ({}):", resolved.artifact, resolved.policy);
    println!();

    for (index, entry) in resolved.entries.iter().enumerate() {
        let repeat = if entry.repeat { " (repeated)" } else { "" };
        println!("  {}. {}{}", index + 1, entry.component, repeat);

        let objects: Vec<String> = entry
            .objects
            .iter()
            .map(|o| o.display().to_string())
            .collect();
        println!("     Objects: {}", objects.join(" "));

        let mut reasons = Vec::new();
        if entry.explicit {
            reasons.push(format!("link target '{}'", resolved.artifact));
        }
        reasons.extend(entry.required_by.iter().cloned());
        println!("     Required by: {}", reasons.join(", "));
        println!();
    }

    Ok(())
}
