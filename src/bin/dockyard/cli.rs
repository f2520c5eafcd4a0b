//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use dockyard::builder::PlanFormat;
use dockyard::core::LinkPolicy;

/// Dockyard - a build-plan generator for C/C++ components
#[derive(Parser)]
#[command(name = "dockyard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Dockyard.toml (defaults to searching upward from cwd)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the build plan
    Plan(PlanArgs),

    /// Show the link order of a link target
    Linkplan(LinkplanArgs),

    /// Display the component dependency tree
    Tree(TreeArgs),

    /// Validate the manifest and every link target
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for PlanFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => PlanFormat::Text,
            FormatArg::Json => PlanFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    SinglePass,
    RepeatCycles,
}

impl From<PolicyArg> for LinkPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::SinglePass => LinkPolicy::SinglePass,
            PolicyArg::RepeatCycles => LinkPolicy::RepeatCycles,
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Link policy for targets without their own
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Only plan these link targets (and the components they need)
    #[arg(long)]
    pub target: Vec<String>,

    /// Also write compile_commands.json to this path
    #[arg(long, value_name = "FILE")]
    pub compile_commands: Option<PathBuf>,

    /// Print the SHA-256 of the plan instead of the plan
    #[arg(long)]
    pub digest: bool,
}

#[derive(Args)]
pub struct LinkplanArgs {
    /// Link target artifact
    pub target: String,

    /// Link policy for targets without their own
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Component to show the tree for (defaults to every link target)
    pub component: Option<String>,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Link policy for targets without their own
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
