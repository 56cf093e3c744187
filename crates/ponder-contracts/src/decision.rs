//! The parsed intent extracted from one model response.

use serde::{Deserialize, Serialize};

use crate::tool::ToolId;

/// What the model decided to do this turn.
///
/// Control flow in the controller is an exhaustive match over these
/// variants. `Malformed` is a parse failure, never a success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Invoke `tool` with `input`.
    Action {
        tool: ToolId,
        /// May be empty; the controller then falls back to the user query.
        input: String,
        rationale: String,
    },

    /// Stop and return `answer`.
    FinalAnswer { answer: String, rationale: String },

    /// The response matched neither recognized shape, or named a tool that
    /// is not registered.
    Malformed {
        raw_text: String,
        /// Why parsing failed, fed back to the model.
        reason: String,
    },
}

impl Decision {
    pub fn malformed(raw_text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed { raw_text: raw_text.into(), reason: reason.into() }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
