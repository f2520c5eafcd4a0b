//! Core data structures for Dockyard.
//!
//! - Components and their object groups
//! - Link targets and link policies
//! - The Dockyard.toml manifest

pub mod component;
pub mod language;
pub mod manifest;
pub mod target;

pub use component::{Component, ObjectGroup, SourceFile};
pub use language::Language;
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use target::{LinkPolicy, LinkTarget};
