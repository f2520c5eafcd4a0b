//! Per-component compile planning.

use crate::builder::errors::PlanError;
use crate::builder::plan::CompileStep;
use crate::builder::toolchain::ToolchainSelector;
use crate::core::component::{Component, ObjectGroup};

/// Compile steps and object files for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileUnit {
    /// One step per source, in declaration order
    pub steps: Vec<CompileStep>,
    /// The objects produced by `steps`, in the same order
    pub objects: ObjectGroup,
}

/// Turns a component's sources into compile steps.
#[derive(Debug, Clone)]
pub struct CompileUnitPlanner<'a> {
    selector: &'a ToolchainSelector,
}

impl<'a> CompileUnitPlanner<'a> {
    pub fn new(selector: &'a ToolchainSelector) -> Self {
        CompileUnitPlanner { selector }
    }

    /// Plan the compile steps of a component.
    ///
    /// Object `i` of the returned group is the output of step `i`, which
    /// compiles source `i` of the component. Fails on the first source whose
    /// extension has no toolchain.
    pub fn plan_compiles(&self, component: &Component) -> Result<CompileUnit, PlanError> {
        let mut steps = Vec::with_capacity(component.sources().len());
        let mut objects = ObjectGroup::new(component.name());

        for source in component.sources() {
            let toolchain = self.selector.resolve(source)?;
            let output = source.object_path();

            objects.objects.push(output.clone());
            steps.push(CompileStep {
                source: source.path().to_path_buf(),
                output,
                component: component.name().to_string(),
                compiler: toolchain.compiler,
                std_flag: toolchain.std_flag,
                placeholders: toolchain.placeholders,
                flags: component.flags().to_string(),
                include_dirs: component.include_dirs().to_vec(),
                lang: toolchain.lang,
            });
        }

        tracing::debug!(
            "planned {} compile step(s) for component {}",
            steps.len(),
            component.name()
        );

        Ok(CompileUnit { steps, objects })
    }
}
