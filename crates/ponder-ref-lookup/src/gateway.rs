//! Offline model gateways.
//!
//! No language model is contacted. [`ScriptedGateway`] replays fixed replies
//! and is what the scenarios and tests use. [`LookupGateway`] reacts to the
//! transcript with a fixed research strategy so the demo can answer
//! arbitrary questions against the reference data.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde_json::{json, Value};
use tracing::debug;

use ponder_contracts::{
    error::{PonderError, PonderResult},
    message::{Message, Role},
    tool::ToolId,
};
use ponder_core::traits::ModelGateway;

// ── Scripted ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Step {
    Reply(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct ScriptState {
    steps: VecDeque<Step>,
    prompts: Vec<Vec<Message>>,
}

/// Replays a fixed sequence of replies and failures, in order.
///
/// Once the script runs out every call fails. Clones share the script and
/// the recorded prompts, so a caller can keep a handle after boxing one
/// clone into a controller.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGateway {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Step::Reply(text.into()))
    }

    /// Append a structured reply, serialized to JSON.
    pub fn reply_json(self, value: Value) -> Self {
        self.push(Step::Reply(value.to_string()))
    }

    /// Append a transport failure.
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.push(Step::Fail(reason.into()))
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.state.lock().map(|s| s.prompts.len()).unwrap_or(0)
    }

    /// Every prompt received, oldest first.
    pub fn prompts(&self) -> Vec<Vec<Message>> {
        self.state.lock().map(|s| s.prompts.clone()).unwrap_or_default()
    }

    fn push(self, step: Step) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.steps.push_back(step);
        }
        self
    }
}

impl ModelGateway for ScriptedGateway {
    fn generate(&self, prompt: &[Message]) -> PonderResult<String> {
        let mut state = self.state.lock().map_err(|e| PonderError::Generation {
            reason: format!("script lock poisoned: {e}"),
        })?;
        state.prompts.push(prompt.to_vec());

        match state.steps.pop_front() {
            Some(Step::Reply(text)) => Ok(text),
            Some(Step::Fail(reason)) => Err(PonderError::Generation { reason }),
            None => Err(PonderError::Generation {
                reason: "script exhausted".to_string(),
            }),
        }
    }
}

// ── Lookup strategy ──────────────────────────────────────────────────────────

/// A deterministic stand-in for a model.
///
/// Strategy per turn, based on the observations gathered since the latest
/// user message:
///
/// 1. none yet: consult the encyclopedia with the question;
/// 2. the last lookup failed on the encyclopedia: fall back to web search;
/// 3. an article or search result arrived: answer from it;
/// 4. everything failed, or no tool calls remain: say so.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupGateway;

impl ModelGateway for LookupGateway {
    fn generate(&self, prompt: &[Message]) -> PonderResult<String> {
        let Some(user_idx) = prompt.iter().rposition(|m| m.role() == Role::User) else {
            return Err(PonderError::Generation {
                reason: "prompt carries no user question".to_string(),
            });
        };
        let question = prompt[user_idx].content();
        let recent = &prompt[user_idx + 1..];

        let out_of_calls = recent
            .last()
            .is_some_and(|m| m.role() == Role::System && m.content().contains("No tool calls remain"));

        let reply = match last_observation(recent) {
            Some((_, body)) if !body.starts_with("Error:") => match answer_from(body) {
                Some(answer) => json!({
                    "thought": "The lookup answered the question.",
                    "answer": answer,
                }),
                None => give_up(question),
            },
            _ if out_of_calls => give_up(question),
            None => json!({
                "thought": "I should check the encyclopedia first.",
                "action": { "name": ToolId::Wikipedia.as_str(), "input": question },
            }),
            Some((ToolId::Wikipedia, _)) => json!({
                "thought": "The encyclopedia had nothing; a web search may.",
                "action": { "name": ToolId::WebSearch.as_str(), "input": question },
            }),
            Some(_) => give_up(question),
        };

        debug!(reply = %reply, "lookup gateway reply");
        Ok(reply.to_string())
    }
}

/// The most recent `Observation (<tool>): <body>` message.
fn last_observation(messages: &[Message]) -> Option<(ToolId, &str)> {
    messages.iter().rev().find_map(|m| {
        let rest = m.content().strip_prefix("Observation (")?;
        let (tool, body) = rest.split_once("): ")?;
        Some((tool.parse().ok()?, body))
    })
}

/// First sentence of an article summary, or the first search snippet.
fn answer_from(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let text = value["summary"]
        .as_str()
        .or_else(|| value["top_results"][0]["snippet"].as_str())?;
    let sentence = match text.find(". ") {
        Some(end) => &text[..=end],
        None => text,
    };
    Some(sentence.trim().to_string())
}

fn give_up(question: &str) -> Value {
    json!({
        "thought": "The tools did not turn up anything useful.",
        "answer": format!("I could not find information about: {}", question.trim()),
    })
}
