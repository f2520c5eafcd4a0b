//! Plan construction errors and diagnostics.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::builder::toolchain::ToolchainSelector;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Where an undeclared component name was referenced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// A `deps` entry of another component
    Dependency { from: String },
    /// A `requires` entry of a link target
    LinkTarget { artifact: String },
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Dependency { from } => write!(f, "dependency of component `{}`", from),
            Reference::LinkTarget { artifact } => write!(f, "link target `{}`", artifact),
        }
    }
}

/// Error during plan construction.
///
/// Every variant aborts the whole plan; nothing is emitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("source file `{}` has unknown extension `{extension}`", .path.display())]
    UnknownExtension { path: PathBuf, extension: String },

    #[error("unknown component `{name}` (referenced by {referenced_by})")]
    UnknownComponent {
        name: String,
        referenced_by: Reference,
    },

    #[error("component `{name}` is declared more than once")]
    DuplicateComponent { name: String },

    #[error("link target `{target}` has a dependency cycle that single-pass linking cannot resolve: {}", .cycle.join(" -> "))]
    UnresolvableCycle { target: String, cycle: Vec<String> },

    #[error("link target `{target}` has no objects to link")]
    EmptyLinkTarget { target: String },
}

impl PlanError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PlanError::UnknownExtension { path, extension } => {
                let known: Vec<_> = ToolchainSelector::extensions().collect();
                Diagnostic::error(self.to_string())
                    .with_location(path.clone())
                    .with_context(format!(
                        "`{}` is not mapped to a compiler (known: {})",
                        if extension.is_empty() { "<none>" } else { extension.as_str() },
                        known.join(", ")
                    ))
                    .with_suggestion(format!(
                        "Remove `{}` from the component's sources",
                        path.display()
                    ))
            }

            PlanError::UnknownComponent {
                name,
                referenced_by,
            } => Diagnostic::error(self.to_string())
                .with_context(format!("`{}` is named by {}", name, referenced_by))
                .with_suggestion(format!("Declare `{}` as a [[component]]", name))
                .with_suggestion(suggestions::CHECK_SPELLING),

            PlanError::DuplicateComponent { name } => Diagnostic::error(self.to_string())
                .with_suggestion(format!("Rename one of the `{}` components", name)),

            PlanError::UnresolvableCycle { target, cycle } => Diagnostic::error(self.to_string())
                .with_context(format!("cycle: {}", cycle.join(" -> ")))
                .with_suggestion(format!(
                    "Set `policy = \"repeat-cycles\"` on link target `{}`",
                    target
                ))
                .with_suggestion(suggestions::BREAK_CYCLE),

            PlanError::EmptyLinkTarget { target } => Diagnostic::error(self.to_string())
                .with_context("no required component produced an object file")
                .with_suggestion(format!(
                    "Add components with sources to `requires` of `{}`",
                    target
                )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_message() {
        let err = PlanError::UnknownExtension {
            path: PathBuf::from("x.rs"),
            extension: ".rs".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("x.rs"));
        assert!(msg.contains("`.rs`"));

        let out = err.to_diagnostic().format(false);
        assert!(out.contains("--> x.rs"));
        assert!(out.contains("known: .c, .cpp, .cc"));
    }

    #[test]
    fn test_unknown_component_names_reference() {
        let err = PlanError::UnknownComponent {
            name: "libfoo".to_string(),
            referenced_by: Reference::Dependency {
                from: "libbar".to_string(),
            },
        };

        assert_eq!(
            err.to_string(),
            "unknown component `libfoo` (referenced by dependency of component `libbar`)"
        );
    }

    #[test]
    fn test_cycle_diagnostic_suggests_policy() {
        let err = PlanError::UnresolvableCycle {
            target: "out".to_string(),
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };

        let out = err.to_diagnostic().format(false);
        assert!(out.contains("cycle: a -> b -> a"));
        assert!(out.contains("repeat-cycles"));
    }
}
