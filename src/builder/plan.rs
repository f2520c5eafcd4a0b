//! Build plan generation.
//!
//! A BuildPlan is the ordered list of compile and link steps for one run.
//! Components are compiled in declaration order; each link step is placed
//! right after the last compile step its link line depends on.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::builder::compile::{CompileUnit, CompileUnitPlanner};
use crate::builder::errors::PlanError;
use crate::builder::graph::ComponentGraph;
use crate::builder::link_order::{LinkOrderResolver, ResolvedLink};
use crate::builder::toolchain::ToolchainSelector;
use crate::core::component::Component;
use crate::core::language::Language;
use crate::core::manifest::Manifest;
use crate::core::target::{LinkPolicy, LinkTarget};
use crate::util::config::PlanConfig;

/// A complete build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// All build steps in execution order
    pub steps: Vec<BuildStep>,
}

/// A build step in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildStep {
    /// Compile a source file to an object file
    Compile(CompileStep),
    /// Link objects into an executable
    Link(LinkStep),
}

/// A single compilation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileStep {
    /// Source file
    pub source: PathBuf,

    /// Output object file
    pub output: PathBuf,

    /// Component this belongs to
    pub component: String,

    /// Compiler program
    pub compiler: String,

    /// Language standard flag
    pub std_flag: String,

    /// Global flag placeholders ($CFLAGS and friends)
    pub placeholders: String,

    /// Component flags, verbatim
    pub flags: String,

    /// Include directories
    pub include_dirs: Vec<String>,

    /// Source language
    #[serde(default)]
    pub lang: Language,
}

/// A single link step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStep {
    /// Output file
    pub artifact: String,

    /// Linker driver
    pub linker: String,

    /// Target's extra linker flags, verbatim
    pub flags: String,

    /// Global link flag placeholder
    pub placeholder: String,

    /// Objects in resolved link order
    pub objects: Vec<PathBuf>,

    /// Components in resolved link order, repeats included
    pub components: Vec<String>,

    /// Policy the order was resolved with
    pub policy: LinkPolicy,
}

/// Options for plan generation.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Merged plan settings
    pub config: PlanConfig,

    /// Only link these artifacts (and compile what they need)
    pub targets: Option<Vec<String>>,
}

/// The component graph together with every component's compile unit.
#[derive(Debug, Clone)]
pub struct PlannedGraph {
    pub graph: ComponentGraph,
    /// Compile unit of each component, in declaration order
    pub units: Vec<CompileUnit>,
}

impl PlannedGraph {
    /// Plan every component's compiles and build the graph from the results.
    pub fn new(components: Vec<Component>, selector: &ToolchainSelector) -> Result<Self, PlanError> {
        let planner = CompileUnitPlanner::new(selector);
        let units = components
            .iter()
            .map(|c| planner.plan_compiles(c))
            .collect::<Result<Vec<_>, _>>()?;

        let graph = ComponentGraph::new(
            components
                .into_iter()
                .zip(units.iter().map(|u| u.objects.clone())),
        )?;

        Ok(PlannedGraph { graph, units })
    }

    pub fn resolver(&self, default_policy: LinkPolicy) -> LinkOrderResolver<'_> {
        LinkOrderResolver::new(&self.graph, default_policy)
    }
}

impl BuildPlan {
    /// Generate the plan for a manifest.
    pub fn from_manifest(manifest: &Manifest, options: &PlanOptions) -> Result<Self, PlanError> {
        Self::generate(manifest.components(), &manifest.link_targets(), options)
    }

    /// Generate the plan for declared components and link targets.
    ///
    /// Every link target is resolved before any step is produced, so a
    /// failure anywhere leaves nothing half-planned.
    pub fn generate(
        components: Vec<Component>,
        targets: &[LinkTarget],
        options: &PlanOptions,
    ) -> Result<Self, PlanError> {
        let selector = ToolchainSelector::from_config(&options.config);
        let planned = PlannedGraph::new(components, &selector)?;
        let resolver = planned.resolver(options.config.policy());

        let selected: Vec<&LinkTarget> = targets
            .iter()
            .filter(|t| match &options.targets {
                Some(filter) => filter.iter().any(|f| *f == t.artifact),
                None => true,
            })
            .collect();

        let mut links = Vec::with_capacity(selected.len());
        for target in &selected {
            let resolved = resolver.resolve_link_order(target)?;
            let closure = planned.graph.closure(&resolver.roots(target)?);
            links.push((*target, resolved, closure));
        }

        let needed: Vec<bool> = match options.targets {
            Some(_) => {
                let mut needed = vec![false; planned.graph.len()];
                for (_, _, closure) in &links {
                    for &i in closure {
                        needed[i] = true;
                    }
                }
                needed
            }
            None => vec![true; planned.graph.len()],
        };

        let mut steps = Vec::new();
        let mut compiled = vec![false; planned.graph.len()];
        let mut linked = vec![false; links.len()];

        for (i, unit) in planned.units.iter().enumerate() {
            if !needed[i] {
                tracing::debug!(
                    "skipping component {} (not needed by selected targets)",
                    unit.objects.component
                );
                continue;
            }

            steps.extend(unit.steps.iter().cloned().map(BuildStep::Compile));
            compiled[i] = true;

            for (j, (target, resolved, closure)) in links.iter().enumerate() {
                if !linked[j] && closure.iter().all(|&c| compiled[c]) {
                    steps.push(BuildStep::Link(link_step(target, resolved, &options.config)));
                    linked[j] = true;
                }
            }
        }

        Ok(BuildPlan { steps })
    }

    /// Compile steps in plan order.
    pub fn compile_steps(&self) -> impl Iterator<Item = &CompileStep> {
        self.steps.iter().filter_map(|step| match step {
            BuildStep::Compile(c) => Some(c),
            BuildStep::Link(_) => None,
        })
    }

    /// Link steps in plan order.
    pub fn link_steps(&self) -> impl Iterator<Item = &LinkStep> {
        self.steps.iter().filter_map(|step| match step {
            BuildStep::Link(l) => Some(l),
            BuildStep::Compile(_) => None,
        })
    }

    /// Get the number of compile steps.
    pub fn compile_count(&self) -> usize {
        self.compile_steps().count()
    }

    /// Get the number of link steps.
    pub fn link_count(&self) -> usize {
        self.link_steps().count()
    }
}

fn link_step(target: &LinkTarget, resolved: &ResolvedLink, config: &PlanConfig) -> LinkStep {
    LinkStep {
        artifact: target.artifact.clone(),
        linker: config.linker().to_string(),
        flags: target.flags.clone(),
        placeholder: config.link_placeholder().to_string(),
        objects: resolved.objects(),
        components: resolved
            .components()
            .into_iter()
            .map(String::from)
            .collect(),
        policy: resolved.policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> (Vec<Component>, Vec<LinkTarget>) {
        let components = vec![
            Component::new("A").with_sources(["a.cpp"]).with_deps(["B"]),
            Component::new("B").with_sources(["b.c"]),
        ];
        let targets = vec![LinkTarget::new("out").with_requires(["A"])];
        (components, targets)
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (components, targets) = scenario();
        let plan = BuildPlan::generate(components, &targets, &PlanOptions::default()).unwrap();

        assert_eq!(plan.steps.len(), 3);

        let compiles: Vec<_> = plan.compile_steps().collect();
        assert_eq!(compiles[0].source, PathBuf::from("a.cpp"));
        assert_eq!(compiles[0].output, PathBuf::from("a.cpp.o"));
        assert_eq!(compiles[0].compiler, "g++");
        assert_eq!(compiles[0].std_flag, "-std=gnu++14");
        assert_eq!(compiles[1].output, PathBuf::from("b.c.o"));
        assert_eq!(compiles[1].compiler, "gcc");
        assert_eq!(compiles[1].std_flag, "-std=gnu11");

        let link = plan.link_steps().next().unwrap();
        assert_eq!(link.artifact, "out");
        assert_eq!(
            link.objects,
            [PathBuf::from("a.cpp.o"), PathBuf::from("b.c.o")]
        );
        assert!(matches!(plan.steps[2], BuildStep::Link(_)));
    }

    #[test]
    fn test_determinism() {
        let (components, targets) = scenario();
        let first =
            BuildPlan::generate(components.clone(), &targets, &PlanOptions::default()).unwrap();
        let second = BuildPlan::generate(components, &targets, &PlanOptions::default()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_extension_aborts_plan() {
        let components = vec![
            Component::new("ok").with_sources(["a.c"]),
            Component::new("bad").with_sources(["x.rs"]),
        ];

        let err = BuildPlan::generate(components, &[], &PlanOptions::default()).unwrap_err();
        assert!(matches!(err, PlanError::UnknownExtension { ref extension, .. } if extension == ".rs"));
    }

    #[test]
    fn test_failing_target_aborts_plan() {
        let components = vec![Component::new("a").with_sources(["a.c"])];
        let targets = vec![
            LinkTarget::new("good").with_requires(["a"]),
            LinkTarget::new("bad").with_requires(["missing"]),
        ];

        assert!(BuildPlan::generate(components, &targets, &PlanOptions::default()).is_err());
    }

    #[test]
    fn test_link_placed_after_last_needed_compile() {
        let components = vec![
            Component::new("sparse").with_sources(["sparse.c"]),
            Component::new("tool").with_sources(["tool.c"]).with_deps(["sparse"]),
            Component::new("other").with_sources(["other.c"]),
        ];
        let targets = vec![LinkTarget::new("bin/tool").with_requires(["tool"])];

        let plan = BuildPlan::generate(components, &targets, &PlanOptions::default()).unwrap();
        let kinds: Vec<_> = plan
            .steps
            .iter()
            .map(|s| match s {
                BuildStep::Compile(c) => c.component.as_str(),
                BuildStep::Link(l) => l.artifact.as_str(),
            })
            .collect();

        assert_eq!(kinds, ["sparse", "tool", "bin/tool", "other"]);
    }

    #[test]
    fn test_target_filter() {
        let components = vec![
            Component::new("a").with_sources(["a.c"]),
            Component::new("b").with_sources(["b.c"]),
        ];
        let targets = vec![
            LinkTarget::new("bin/a").with_requires(["a"]),
            LinkTarget::new("bin/b").with_requires(["b"]),
        ];
        let options = PlanOptions {
            targets: Some(vec!["bin/b".to_string()]),
            ..Default::default()
        };

        let plan = BuildPlan::generate(components, &targets, &options).unwrap();

        assert_eq!(plan.compile_count(), 1);
        assert_eq!(plan.link_count(), 1);
        assert_eq!(plan.compile_steps().next().unwrap().component, "b");
    }

    #[test]
    fn test_config_overrides_programs() {
        let (components, targets) = scenario();
        let options = PlanOptions {
            config: PlanConfig {
                cxx: Some("clang++".to_string()),
                linker: Some("clang++".to_string()),
                link_placeholder: Some("$MY_LDFLAGS".to_string()),
                ..Default::default()
            },
            targets: None,
        };

        let plan = BuildPlan::generate(components, &targets, &options).unwrap();
        let link = plan.link_steps().next().unwrap();

        assert_eq!(plan.compile_steps().next().unwrap().compiler, "clang++");
        assert_eq!(link.linker, "clang++");
        assert_eq!(link.placeholder, "$MY_LDFLAGS");
    }

    #[test]
    fn test_plan_serialization() {
        let (components, targets) = scenario();
        let plan = BuildPlan::generate(components, &targets, &PlanOptions::default()).unwrap();

        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains(r#""type":"compile""#));
        assert!(json.contains(r#""type":"link""#));

        let back: BuildPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
