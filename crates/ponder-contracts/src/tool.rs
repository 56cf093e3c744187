//! Tool identifiers and observations.
//!
//! The set of tools is closed: a model-facing name either resolves onto one
//! of the `ToolId` variants or it is rejected. Invalid names therefore never
//! reach dispatch.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::PonderError;

/// The closed set of lookup capabilities the controller can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    /// Encyclopedia summary lookup.
    Wikipedia,
    /// General web search.
    WebSearch,
    /// Explicit "no tool". Dispatchable only if something is registered for it.
    None,
}

impl ToolId {
    pub const ALL: [ToolId; 3] = [ToolId::Wikipedia, ToolId::WebSearch, ToolId::None];

    /// Canonical model-facing name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia",
            Self::WebSearch => "web_search",
            Self::None => "none",
        }
    }

    /// One-line description advertised to the model.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Wikipedia => "Returns a summary from searching Wikipedia",
            Self::WebSearch => "Performs a web search and returns the top results",
            Self::None => "Takes no action",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = PonderError;

    /// Case-insensitive; separators (`_`, `-`, spaces) are ignored so that
    /// `web_search`, `WebSearch` and `web-search` all resolve. A few aliases
    /// models commonly emit are accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "wikipedia" | "wiki" | "wikipediasearch" | "encyclopedia" => Ok(Self::Wikipedia),
            "websearch" | "google" | "googlesearch" | "search" | "serp" => Ok(Self::WebSearch),
            "none" => Ok(Self::None),
            _ => Err(PonderError::UnknownTool { name: s.trim().to_string() }),
        }
    }
}

/// The text result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// The tool that produced this observation.
    pub source: ToolId,
    /// Tool output, or a diagnostic beginning with `"Error: "` when the
    /// invocation failed.
    pub text: String,
    /// True when `text` is a diagnostic rather than tool output.
    pub failed: bool,
}

impl Observation {
    pub fn success(source: ToolId, text: impl Into<String>) -> Self {
        Self { source, text: text.into(), failed: false }
    }

    pub fn failure(source: ToolId, error: impl fmt::Display) -> Self {
        Self { source, text: format!("Error: {error}"), failed: true }
    }
}
