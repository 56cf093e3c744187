//! Loop configuration.
//!
//! Every field has a default so a partial `[agent]` table in TOML, or
//! `LoopConfig::default()`, is always usable.

use serde::{Deserialize, Serialize};

/// Where tool observations go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationPolicy {
    /// Appended to the transcript as system messages, visible to the model.
    #[default]
    Transcript,
    /// Written to trace sinks only. The model does not see tool results.
    TraceOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Iterations (actions plus malformed decisions) allowed per query.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Consecutive gateway failures retried before giving up.
    #[serde(default = "default_generation_retries")]
    pub generation_retries: u32,

    #[serde(default)]
    pub observations: ObservationPolicy,

    /// List gathered observations in the degraded answer on exhaustion.
    #[serde(default = "default_true")]
    pub include_partial_context: bool,

    #[serde(default = "default_true")]
    pub seed_system_prompt: bool,

    /// Replaces the built-in system prompt when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_iterations() -> u32 {
    3
}

fn default_generation_retries() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            generation_retries: default_generation_retries(),
            observations: ObservationPolicy::default(),
            include_partial_context: true,
            seed_system_prompt: true,
            system_prompt: None,
        }
    }
}

impl LoopConfig {
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
