//! Trace entries: the observational side channel.
//!
//! The controller emits one `TraceEntry` per message it creates, one per
//! reasoning iteration, and one when the query terminates. Sinks render or
//! chain them; nothing reads them back into the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    execution::Termination,
    message::{Message, Role},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceKind {
    /// A message was created. `in_transcript` is false for observations
    /// kept out of the model's context by the trace-only policy.
    Message { role: Role, content: String, in_transcript: bool },
    /// A reasoning iteration (one model call) is starting.
    Iteration { number: u32 },
    /// The query reached a terminal state.
    Terminated { termination: Termination },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub kind: TraceKind,
    pub timestamp: DateTime<Utc>,
}

impl TraceEntry {
    pub fn message(message: &Message, in_transcript: bool) -> Self {
        Self::now(TraceKind::Message {
            role: message.role(),
            content: message.content().to_string(),
            in_transcript,
        })
    }

    pub fn iteration(number: u32) -> Self {
        Self::now(TraceKind::Iteration { number })
    }

    pub fn terminated(termination: Termination) -> Self {
        Self::now(TraceKind::Terminated { termination })
    }

    fn now(kind: TraceKind) -> Self {
        Self { kind, timestamp: Utc::now() }
    }

    /// Plain-text rendering: `"<role>: <content>\n"` for messages, a
    /// delimiter line otherwise.
    pub fn render_line(&self) -> String {
        match &self.kind {
            TraceKind::Message { role, content, .. } => format!("{role}: {content}\n"),
            TraceKind::Iteration { number } => format!("--- iteration {number} ---\n"),
            TraceKind::Terminated { termination } => format!("=== {termination} ===\n"),
        }
    }
}
