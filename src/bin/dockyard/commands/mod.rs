//! Command implementations

pub mod check;
pub mod completions;
pub mod linkplan;
pub mod plan;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::cli::PolicyArg;
use dockyard::builder::plan::PlannedGraph;
use dockyard::builder::ToolchainSelector;
use dockyard::core::{LinkTarget, Manifest};
use dockyard::util::config::PlanConfig;
use dockyard::util::diagnostic::suggestions;
use dockyard::util::GlobalContext;

/// A loaded manifest with its merged plan settings.
pub struct Project {
    /// Directory containing Dockyard.toml
    pub root: PathBuf,
    pub manifest: Manifest,
    /// Global config < project config < manifest [plan] < command line
    pub config: PlanConfig,
}

impl Project {
    /// Locate and load the manifest, then layer the configuration.
    pub fn load(
        ctx: &GlobalContext,
        manifest: Option<&Path>,
        policy: Option<PolicyArg>,
    ) -> Result<Self> {
        let manifest_path = match manifest {
            Some(path) => ctx.cwd().join(path),
            None => match ctx.find_manifest() {
                Some(path) => path,
                None => bail!(
                    "could not find Dockyard.toml in {} or any parent directory\n{}",
                    ctx.cwd().display(),
                    suggestions::NO_MANIFEST
                ),
            },
        };
        tracing::debug!("using manifest {}", manifest_path.display());

        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| ctx.cwd().to_path_buf());
        let manifest = Manifest::load(&manifest_path)?;

        let mut config = ctx.load_config(&root).plan;
        config.merge(manifest.plan.clone());
        if let Some(policy) = policy {
            config.merge(PlanConfig {
                policy: Some(policy.into()),
                ..Default::default()
            });
        }

        Ok(Project {
            root,
            manifest,
            config,
        })
    }

    /// Plan every component's compiles and build the component graph.
    pub fn planned_graph(&self) -> Result<PlannedGraph> {
        let selector = ToolchainSelector::from_config(&self.config);
        Ok(PlannedGraph::new(self.manifest.components(), &selector)?)
    }

    /// Look up a declared link target by artifact.
    pub fn link_target(&self, artifact: &str) -> Result<LinkTarget> {
        match self
            .manifest
            .link_targets()
            .into_iter()
            .find(|t| t.artifact == artifact)
        {
            Some(target) => Ok(target),
            None => bail!(
                "link target `{}` not found\n{}",
                artifact,
                suggestions::TARGET_NOT_FOUND
            ),
        }
    }
}
