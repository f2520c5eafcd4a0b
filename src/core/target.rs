//! Link targets and link-order policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the link order resolver treats dependency cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPolicy {
    /// Every object group appears exactly once. Cycles between components
    /// are refused.
    #[default]
    SinglePass,
    /// Cyclic groups are repeated on the link line so a single left-to-right
    /// pass resolves every edge inside the cycle.
    RepeatCycles,
}

impl LinkPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPolicy::SinglePass => "single-pass",
            LinkPolicy::RepeatCycles => "repeat-cycles",
        }
    }
}

impl fmt::Display for LinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-pass" => Ok(LinkPolicy::SinglePass),
            "repeat-cycles" => Ok(LinkPolicy::RepeatCycles),
            _ => Err(format!(
                "invalid link policy '{}', valid values: single-pass, repeat-cycles",
                s
            )),
        }
    }
}

/// A final executable and the components linked into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    /// Output path of the linked artifact
    pub artifact: String,

    /// Explicitly required components, in link-line order
    pub requires: Vec<String>,

    /// Extra linker flags, passed through untouched
    pub flags: String,

    /// Per-target override of the plan-wide link policy
    pub policy: Option<LinkPolicy>,
}

impl LinkTarget {
    pub fn new(artifact: impl Into<String>) -> Self {
        LinkTarget {
            artifact: artifact.into(),
            requires: Vec::new(),
            flags: String::new(),
            policy: None,
        }
    }

    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    pub fn with_policy(mut self, policy: LinkPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// The policy in effect for this target.
    pub fn effective_policy(&self, default: LinkPolicy) -> LinkPolicy {
        self.policy.unwrap_or(default)
    }
}
