//! Configuration parsing and diffing.
//!
//! [`NetworkConfig`] turns configuration text into ordered [`ConfigLine`]s
//! and computes the lines needed to move one configuration to another.
//! [`diff`] wraps that into the request/response shape used by
//! [`Cliconf::get_diff`](crate::cliconf::Cliconf::get_diff).

mod line;
mod network;

pub use line::ConfigLine;
pub use network::{NetworkConfig, ParserOptions, dumps};

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How candidate lines are compared against running lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMatch {
    /// A line is an update when it is absent from running.
    #[default]
    Line,
    /// A line is an update when running differs at the same position.
    Strict,
    /// Everything is an update unless both configurations are identical.
    Exact,
    /// Everything is an update.
    None,
}

impl FromStr for DiffMatch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "line" => Ok(DiffMatch::Line),
            "strict" => Ok(DiffMatch::Strict),
            "exact" => Ok(DiffMatch::Exact),
            "none" => Ok(DiffMatch::None),
            _ => Err(ConfigError::UnknownDiffMatch(s.to_string())),
        }
    }
}

impl fmt::Display for DiffMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiffMatch::Line => "line",
            DiffMatch::Strict => "strict",
            DiffMatch::Exact => "exact",
            DiffMatch::None => "none",
        })
    }
}

/// Granularity of emitted updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffReplace {
    /// Only the differing lines.
    #[default]
    Line,
    /// The whole top-level block around a differing line.
    Block,
}

impl FromStr for DiffReplace {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "line" => Ok(DiffReplace::Line),
            "block" => Ok(DiffReplace::Block),
            _ => Err(ConfigError::UnknownDiffReplace(s.to_string())),
        }
    }
}

impl fmt::Display for DiffReplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiffReplace::Line => "line",
            DiffReplace::Block => "block",
        })
    }
}

/// Text layout for [`dumps`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    /// Bare command texts.
    #[default]
    Commands,
    /// Indented by hierarchy.
    Block,
    /// Lines as they were loaded.
    Raw,
}

impl FromStr for DumpFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "commands" => Ok(DumpFormat::Commands),
            "block" => Ok(DumpFormat::Block),
            "raw" => Ok(DumpFormat::Raw),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Result of a diff request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDiff {
    /// Commands to apply, newline separated. Empty when nothing differs.
    pub config_diff: String,

    /// Banner changes keyed by banner name. RouterOS has none to diff.
    pub banner_diff: IndexMap<String, String>,
}

impl ConfigDiff {
    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.config_diff.is_empty() && self.banner_diff.is_empty()
    }
}

/// Inputs for a configuration diff.
///
/// Deserializable with defaults for everything but `candidate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DiffRequest {
    /// Desired configuration text.
    pub candidate: String,

    /// Current configuration text, if known.
    #[serde(default)]
    pub running: Option<String>,

    /// How candidate lines are compared against running lines.
    #[serde(default)]
    pub diff_match: DiffMatch,

    /// Regexes for running-config lines to leave out of the comparison.
    #[serde(default)]
    pub diff_ignore_lines: Vec<String>,

    /// Restrict the diff to lines beneath this parent path.
    #[serde(default)]
    pub path: Vec<String>,

    /// Granularity of emitted updates.
    #[serde(default)]
    pub diff_replace: DiffReplace,
}

impl DiffRequest {
    /// Request a diff of `candidate` with every option at its default.
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            ..Self::default()
        }
    }

    /// Compare against this running configuration.
    pub fn running(mut self, running: impl Into<String>) -> Self {
        self.running = Some(running.into());
        self
    }

    /// Set the match mode.
    pub fn diff_match(mut self, diff_match: DiffMatch) -> Self {
        self.diff_match = diff_match;
        self
    }

    /// Set the replace mode.
    pub fn diff_replace(mut self, diff_replace: DiffReplace) -> Self {
        self.diff_replace = diff_replace;
        self
    }

    /// Add a regex for running-config lines to skip.
    pub fn ignore_line(mut self, pattern: impl Into<String>) -> Self {
        self.diff_ignore_lines.push(pattern.into());
        self
    }

    /// Restrict the diff to lines beneath `path`.
    pub fn path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }
}

/// Compute the commands that bring `request.running` to `request.candidate`.
///
/// Without a running configuration, or with [`DiffMatch::None`], every
/// candidate line (beneath `path`) is an update. Ignore patterns apply to the
/// running configuration only.
pub fn diff(request: &DiffRequest, options: &ParserOptions) -> Result<ConfigDiff, ConfigError> {
    let candidate = NetworkConfig::parse(&request.candidate, options.clone());

    let updates = match (&request.running, request.diff_match) {
        (Some(running), diff_match) if diff_match != DiffMatch::None => {
            let mut running_config =
                NetworkConfig::new(options.clone()).with_ignore_lines(&request.diff_ignore_lines)?;
            running_config.load(running);
            candidate.difference(&running_config, &request.path, diff_match, request.diff_replace)
        }
        _ => candidate.difference(
            &NetworkConfig::new(options.clone()),
            &request.path,
            DiffMatch::None,
            request.diff_replace,
        ),
    };

    Ok(ConfigDiff {
        config_diff: dumps(&updates, DumpFormat::Commands, options.indent),
        banner_diff: IndexMap::new(),
    })
}
