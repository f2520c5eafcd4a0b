//! Plan emission.
//!
//! The emitter renders an already validated plan; it never reorders,
//! deduplicates or rewrites steps. Text output is one shell line per step:
//!
//! ```text
//! <compiler> -o <object> <std flag> <placeholders> <flags> <-I dirs> -c <source>
//! <linker> -o <artifact> <flags> <placeholder> <objects...>
//! ```
//!
//! Empty fields are dropped so no line carries doubled spaces.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::plan::{BuildPlan, BuildStep, CompileStep, LinkStep};
use crate::util::hash::sha256_str;

/// Output format of `dockyard plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanFormat {
    /// One shell command per line
    #[default]
    Text,
    /// The BuildPlan as JSON
    Json,
}

/// Writes build plans to a sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanEmitter {
    format: PlanFormat,
}

impl PlanEmitter {
    pub fn new(format: PlanFormat) -> Self {
        PlanEmitter { format }
    }

    /// Write the plan to `sink` in this emitter's format.
    pub fn emit<W: Write>(&self, plan: &BuildPlan, sink: &mut W) -> Result<()> {
        match self.format {
            PlanFormat::Text => {
                for step in &plan.steps {
                    writeln!(sink, "{}", render_step(step))?;
                }
            }
            PlanFormat::Json => {
                serde_json::to_writer_pretty(&mut *sink, plan)?;
                writeln!(sink)?;
            }
        }
        sink.flush()?;
        Ok(())
    }
}

/// All text lines of a plan.
pub fn plan_lines(plan: &BuildPlan) -> Vec<String> {
    plan.steps.iter().map(render_step).collect()
}

/// SHA-256 of the plan's text rendering.
pub fn plan_digest(plan: &BuildPlan) -> String {
    let mut text = String::new();
    for line in plan_lines(plan) {
        text.push_str(&line);
        text.push('\n');
    }
    sha256_str(&text)
}

pub fn render_step(step: &BuildStep) -> String {
    match step {
        BuildStep::Compile(c) => compile_line(c),
        BuildStep::Link(l) => link_line(l),
    }
}

/// Render a compile step as a shell command.
pub fn compile_line(step: &CompileStep) -> String {
    let output = step.output.display().to_string();
    let source = step.source.display().to_string();
    let includes: Vec<String> = step
        .include_dirs
        .iter()
        .map(|dir| format!("-I{}", dir))
        .collect();

    let mut parts = vec![
        step.compiler.as_str(),
        "-o",
        output.as_str(),
        step.std_flag.as_str(),
        step.placeholders.as_str(),
        step.flags.as_str(),
    ];
    parts.extend(includes.iter().map(String::as_str));
    parts.extend(["-c", source.as_str()]);

    join_tokens(parts)
}

/// Render a link step as a shell command.
pub fn link_line(step: &LinkStep) -> String {
    let objects: Vec<String> = step
        .objects
        .iter()
        .map(|o| o.display().to_string())
        .collect();

    let mut parts = vec![
        step.linker.as_str(),
        "-o",
        step.artifact.as_str(),
        step.flags.as_str(),
        step.placeholder.as_str(),
    ];
    parts.extend(objects.iter().map(String::as_str));

    join_tokens(parts)
}

fn join_tokens<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// compile_commands.json entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Compilation database entries for every compile step, relative to
/// `directory`. Commands are kept as shell strings since flags are opaque.
pub fn compile_commands(plan: &BuildPlan, directory: &Path) -> Vec<CompileCommand> {
    plan.compile_steps()
        .map(|step| CompileCommand {
            directory: directory.display().to_string(),
            file: step.source.display().to_string(),
            command: compile_line(step),
            output: Some(step.output.display().to_string()),
        })
        .collect()
}

/// Write compile_commands.json content to a sink.
pub fn emit_compile_commands<W: Write>(
    plan: &BuildPlan,
    directory: &Path,
    sink: &mut W,
) -> Result<()> {
    let commands = compile_commands(plan, directory);
    serde_json::to_writer_pretty(&mut *sink, &commands)?;
    writeln!(sink)?;
    Ok(())
}
