//! Toolchain selection by source file extension.
//!
//! The mapping is a static table. Supporting another language means adding
//! a row to [`TOOLCHAINS`]; callers only ever see [`Toolchain`] values.

use serde::{Deserialize, Serialize};

use crate::builder::errors::PlanError;
use crate::core::component::SourceFile;
use crate::core::language::Language;
use crate::util::config::PlanConfig;

/// One row of the extension table.
#[derive(Debug, Clone, Copy)]
pub struct ToolchainRow {
    pub extension: &'static str,
    pub lang: Language,
    pub std_flag: &'static str,
    /// Environment flag variables passed through to the compile line
    pub placeholders: &'static str,
}

/// Recognized source extensions.
pub const TOOLCHAINS: &[ToolchainRow] = &[
    ToolchainRow {
        extension: ".c",
        lang: Language::C,
        std_flag: "-std=gnu11",
        placeholders: "$CFLAGS $CPPFLAGS",
    },
    ToolchainRow {
        extension: ".cpp",
        lang: Language::Cxx,
        std_flag: "-std=gnu++14",
        placeholders: "$CXXFLAGS $CPPFLAGS",
    },
    ToolchainRow {
        extension: ".cc",
        lang: Language::Cxx,
        std_flag: "-std=gnu++14",
        placeholders: "$CXXFLAGS $CPPFLAGS",
    },
];

/// The compiler invocation settings for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    /// Compiler program
    pub compiler: String,
    /// Language standard flag
    pub std_flag: String,
    /// Global flag placeholders
    pub placeholders: String,
    /// Source language
    pub lang: Language,
}

/// Maps source extensions to toolchains.
#[derive(Debug, Clone)]
pub struct ToolchainSelector {
    cc: String,
    cxx: String,
}

impl Default for ToolchainSelector {
    fn default() -> Self {
        ToolchainSelector {
            cc: "gcc".to_string(),
            cxx: "g++".to_string(),
        }
    }
}

impl ToolchainSelector {
    /// Selector with compiler programs taken from configuration. Only the
    /// program names can be overridden, never the standard flags.
    pub fn from_config(config: &PlanConfig) -> Self {
        let defaults = Self::default();
        ToolchainSelector {
            cc: config.cc.clone().unwrap_or(defaults.cc),
            cxx: config.cxx.clone().unwrap_or(defaults.cxx),
        }
    }

    /// Look up the toolchain for an extension (with leading dot).
    pub fn lookup(&self, extension: &str) -> Option<Toolchain> {
        TOOLCHAINS
            .iter()
            .find(|row| row.extension == extension)
            .map(|row| Toolchain {
                compiler: self.compiler_for(row.lang).to_string(),
                std_flag: row.std_flag.to_string(),
                placeholders: row.placeholders.to_string(),
                lang: row.lang,
            })
    }

    /// Resolve the toolchain for a source file.
    pub fn resolve(&self, source: &SourceFile) -> Result<Toolchain, PlanError> {
        self.lookup(source.extension())
            .ok_or_else(|| PlanError::UnknownExtension {
                path: source.path().to_path_buf(),
                extension: source.extension().to_string(),
            })
    }

    pub fn compiler_for(&self, lang: Language) -> &str {
        match lang {
            Language::C => &self.cc,
            Language::Cxx => &self.cxx,
        }
    }

    /// All recognized extensions, in table order.
    pub fn extensions() -> impl Iterator<Item = &'static str> {
        TOOLCHAINS.iter().map(|row| row.extension)
    }
}
