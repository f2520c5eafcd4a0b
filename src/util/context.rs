//! Global context for Dockyard operations.
//!
//! Provides centralized access to the working directory, configuration
//! locations and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::find_manifest as find_manifest_in;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file (~/.dockyard/config.toml), if a home exists
    global_config: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            global_config: global_config_path(),
            verbose: false,
            color: true,
        }
    }

    /// Use a different global config file, or none.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_config.as_deref()
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find Dockyard.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Option<PathBuf> {
        self.cwd.ancestors().find_map(find_manifest_in)
    }

    /// Merged global and project configuration for a project root.
    pub fn load_config(&self, project_root: &Path) -> Config {
        load_config(
            self.global_config_path(),
            &project_config_path(project_root),
        )
    }
}
