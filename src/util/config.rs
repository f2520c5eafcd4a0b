//! Configuration file support for Dockyard.
//!
//! Dockyard reads two configuration files:
//! - Global: `~/.dockyard/config.toml` - User-wide defaults
//! - Project: `.dockyard/config.toml` next to the manifest
//!
//! Project config takes precedence over global config. The manifest's own
//! `[plan]` table and command-line flags are layered on top by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::target::LinkPolicy;

/// Default linker driver.
pub const DEFAULT_LINKER: &str = "g++";

/// Placeholder emitted on every link line after the target's own flags.
pub const DEFAULT_LINK_PLACEHOLDER: &str = "$LDFLAGS";

/// Dockyard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plan settings
    pub plan: PlanConfig,
}

/// Plan settings. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct PlanConfig {
    /// Link policy applied to targets without their own
    pub policy: Option<LinkPolicy>,

    /// C compiler program (replaces `gcc`)
    pub cc: Option<String>,

    /// C++ compiler program (replaces `g++`)
    pub cxx: Option<String>,

    /// Linker driver (replaces `g++`)
    pub linker: Option<String>,

    /// Placeholder token emitted on link lines (replaces `$LDFLAGS`)
    pub link_placeholder: Option<String>,
}

impl PlanConfig {
    /// Merge another layer into this one (other takes precedence).
    pub fn merge(&mut self, other: PlanConfig) {
        if other.policy.is_some() {
            self.policy = other.policy;
        }
        if other.cc.is_some() {
            self.cc = other.cc;
        }
        if other.cxx.is_some() {
            self.cxx = other.cxx;
        }
        if other.linker.is_some() {
            self.linker = other.linker;
        }
        if other.link_placeholder.is_some() {
            self.link_placeholder = other.link_placeholder;
        }
    }

    pub fn policy(&self) -> LinkPolicy {
        self.policy.unwrap_or_default()
    }

    pub fn linker(&self) -> &str {
        self.linker.as_deref().unwrap_or(DEFAULT_LINKER)
    }

    pub fn link_placeholder(&self) -> &str {
        self.link_placeholder
            .as_deref()
            .unwrap_or(DEFAULT_LINK_PLACEHOLDER)
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("failed to load config from {}: {:#}", path.display(), e);
            Self::default()
        })
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.plan.merge(other.plan);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.dockyard/config.toml)
/// 2. Global config (~/.dockyard/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global dockyard config directory (~/.dockyard).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".dockyard"))
}

/// Get the global config path (~/.dockyard/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.dockyard/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".dockyard").join("config.toml")
}
