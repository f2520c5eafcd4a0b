//! `dockyard plan` command

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::Project;
use crate::cli::PlanArgs;
use dockyard::builder::emit::{emit_compile_commands, plan_digest};
use dockyard::builder::{BuildPlan, PlanEmitter, PlanOptions};
use dockyard::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>, args: PlanArgs) -> Result<()> {
    let project = Project::load(ctx, manifest, args.policy)?;

    for artifact in &args.target {
        project.link_target(artifact)?;
    }

    let options = PlanOptions {
        config: project.config.clone(),
        targets: (!args.target.is_empty()).then_some(args.target),
    };
    let plan = BuildPlan::from_manifest(&project.manifest, &options)?;

    tracing::debug!(
        "planned {} compile step(s) and {} link step(s) for {}",
        plan.compile_count(),
        plan.link_count(),
        project.manifest.project.name
    );

    if let Some(path) = &args.compile_commands {
        let path = ctx.cwd().join(path);
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        emit_compile_commands(&plan, &ctx.cwd().join(&project.root), &mut writer)?;
        writer.flush()?;
        tracing::info!("wrote {}", path.display());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.digest {
        writeln!(out, "{}", plan_digest(&plan))?;
    } else {
        PlanEmitter::new(args.format.into()).emit(&plan, &mut out)?;
    }

    Ok(())
}
