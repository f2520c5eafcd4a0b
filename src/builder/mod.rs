//! Build planning.
//!
//! Turns declared components and link targets into an ordered list of
//! compile and link command lines.

pub mod compile;
pub mod emit;
pub mod errors;
pub mod graph;
pub mod link_order;
pub mod plan;
pub mod toolchain;

pub use compile::{CompileUnit, CompileUnitPlanner};
pub use emit::{PlanEmitter, PlanFormat};
pub use errors::PlanError;
pub use graph::ComponentGraph;
pub use link_order::{LinkOrderResolver, ResolvedLink};
pub use plan::{BuildPlan, BuildStep, PlanOptions};
pub use toolchain::{Toolchain, ToolchainSelector};
