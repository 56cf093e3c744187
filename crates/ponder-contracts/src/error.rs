//! Runtime error types for the Ponder reasoning loop.
//!
//! Most of these never reach a caller of `Controller::execute`: gateway,
//! tool and parse failures are folded back into the transcript. Only the
//! programmer errors (`EmptyQuery`, `NoToolsRegistered`) escape it.

use thiserror::Error;

/// The unified error type for the Ponder crates.
#[derive(Debug, Error)]
pub enum PonderError {
    /// The model gateway failed or returned empty text.
    #[error("generation failed: {reason}")]
    Generation { reason: String },

    /// A gateway or tool call was cancelled by its caller-supplied token.
    #[error("call cancelled: {reason}")]
    Cancelled { reason: String },

    /// A tool's underlying lookup failed.
    #[error("tool '{tool}' failed: {reason}")]
    Tool { tool: String, reason: String },

    /// A tool identifier could not be resolved.
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    /// `Transcript::last()` was called before anything was appended.
    #[error("transcript is empty")]
    EmptyTranscript,

    /// `execute` was called with a blank query.
    #[error("query must not be empty")]
    EmptyQuery,

    /// `execute` was called on a controller whose registry holds no tools.
    #[error("no tools registered; the system prompt advertises tools the controller cannot dispatch")]
    NoToolsRegistered,

    /// A trace sink could not record an entry.
    #[error("trace write failed: {reason}")]
    TraceWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl PonderError {
    /// True for the failures the controller handles as a gateway failure
    /// (one retry, then terminal).
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::Generation { .. } | Self::Cancelled { .. })
    }
}

/// Convenience alias used throughout the Ponder crates.
pub type PonderResult<T> = Result<T, PonderError>;
