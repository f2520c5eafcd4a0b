//! Dockyard.toml manifest parsing and schema.
//!
//! The manifest is the declarative input of the planner: components with
//! their sources, flags and dependency edges, and the link targets built
//! from them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::component::Component;
use crate::core::target::LinkTarget;
use crate::util::config::PlanConfig;

/// File name of the manifest.
pub const MANIFEST_NAME: &str = "Dockyard.toml";

/// The parsed Dockyard.toml manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Project metadata
    pub project: ProjectMetadata,

    /// Plan settings, overriding configuration files
    #[serde(default)]
    pub plan: PlanConfig,

    /// Declared components, in declaration order
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentSpec>,

    /// Declared link targets, in declaration order
    #[serde(default, rename = "link")]
    pub links: Vec<LinkSpec>,
}

/// The [project] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMetadata {
    pub name: String,
}

/// A `[[component]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ComponentSpec {
    /// Component name, referenced by `deps` and `requires`
    pub name: String,

    /// Directory prefix joined to every source
    #[serde(default)]
    pub dir: Option<String>,

    /// Source files relative to `dir`
    #[serde(default)]
    pub sources: Vec<String>,

    /// Common compiler flags
    #[serde(default)]
    pub flags: String,

    /// Include directories, rendered as -I flags after `flags`
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Components whose objects resolve this component's undefined symbols
    #[serde(default)]
    pub deps: Vec<String>,
}

impl ComponentSpec {
    /// Source paths with `dir` applied.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        let dir = Path::new(self.dir.as_deref().unwrap_or(""));
        self.sources.iter().map(|s| dir.join(s)).collect()
    }

    pub fn to_component(&self) -> Component {
        Component::new(self.name.clone())
            .with_sources(self.source_paths())
            .with_flags(self.flags.clone())
            .with_include_dirs(self.include_dirs.iter().cloned())
            .with_deps(self.deps.iter().cloned())
    }
}

/// A `[[link]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkSpec {
    /// Output path of the executable
    pub artifact: String,

    /// Required components
    #[serde(default)]
    pub requires: Vec<String>,

    /// Extra linker flags
    #[serde(default)]
    pub flags: String,

    /// Link policy override for this target
    #[serde(default)]
    pub policy: Option<crate::core::target::LinkPolicy>,
}

impl LinkSpec {
    pub fn to_link_target(&self) -> LinkTarget {
        LinkTarget {
            artifact: self.artifact.clone(),
            requires: self.requires.clone(),
            flags: self.flags.clone(),
            policy: self.policy,
        }
    }
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse a manifest from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        Ok(manifest)
    }

    /// Components in declaration order.
    pub fn components(&self) -> Vec<Component> {
        self.components.iter().map(ComponentSpec::to_component).collect()
    }

    /// Link targets in declaration order.
    pub fn link_targets(&self) -> Vec<LinkTarget> {
        self.links.iter().map(LinkSpec::to_link_target).collect()
    }
}

/// Look for the manifest in `dir` (no upward search).
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}
