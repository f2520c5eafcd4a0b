//! Dockyard - a build-plan generator for C/C++ components
//!
//! This crate turns a declarative list of components and link targets into
//! an ordered, deterministic list of compile and link command lines.

pub mod builder;
pub mod core;
pub mod util;

/// Graph builders for unit tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildPlan, PlanError};
pub use core::{component::Component, manifest::Manifest, target::LinkTarget};
pub use util::context::GlobalContext;
