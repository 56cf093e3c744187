//! TOML-driven runtime configuration.
//!
//! ```toml
//! [agent]
//! max_iterations = 3
//! generation_retries = 1
//! observations = "transcript"      # or "trace-only"
//!
//! [retention]
//! strategy = "char-budget"         # "keep-all" | "char-budget" | "recent-window"
//! max_chars = 8000
//!
//! [trace]
//! path = "ponder-trace.log"
//! ```
//!
//! Every section is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use ponder_contracts::{
    config::LoopConfig,
    error::{PonderError, PonderResult},
};
use ponder_core::{
    retention::{CharBudget, KeepAll, RecentWindow},
    traits::RetentionPolicy,
};
use ponder_trace::FileTraceSink;

/// Which messages are rendered to the model each turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum RetentionConfig {
    #[default]
    KeepAll,
    /// Newest messages whose combined content fits in `max_chars`.
    CharBudget { max_chars: usize },
    /// The newest `max_messages` messages.
    RecentWindow { max_messages: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Plain-text trace file, appended to. No file output when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PonderConfig {
    #[serde(default)]
    pub agent: LoopConfig,

    #[serde(default)]
    pub retention: RetentionConfig,

    #[serde(default)]
    pub trace: TraceConfig,
}

impl PonderConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `PonderError::ConfigError` if the TOML is malformed, does not
    /// match the expected layout, or holds a zero retention bound.
    pub fn from_toml_str(s: &str) -> PonderResult<Self> {
        let config: PonderConfig = toml::from_str(s).map_err(|e| PonderError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            max_iterations = config.agent.max_iterations,
            retention = ?config.retention,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> PonderResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PonderError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> PonderResult<()> {
        let zero = match self.retention {
            RetentionConfig::CharBudget { max_chars: 0 } => Some("max_chars"),
            RetentionConfig::RecentWindow { max_messages: 0 } => Some("max_messages"),
            _ => None,
        };
        match zero {
            Some(key) => Err(PonderError::ConfigError {
                reason: format!("retention {key} must be greater than zero"),
            }),
            None => Ok(()),
        }
    }

    /// Build the configured retention policy.
    pub fn retention_policy(&self) -> Box<dyn RetentionPolicy> {
        match self.retention {
            RetentionConfig::KeepAll => Box::new(KeepAll),
            RetentionConfig::CharBudget { max_chars } => Box::new(CharBudget::new(max_chars)),
            RetentionConfig::RecentWindow { max_messages } => {
                Box::new(RecentWindow::new(max_messages))
            }
        }
    }

    /// Open the configured trace file, if any.
    pub fn trace_sink(&self) -> PonderResult<Option<FileTraceSink>> {
        self.trace
            .path
            .as_deref()
            .map(FileTraceSink::open)
            .transpose()
    }
}
