//! Trait definitions for every seam of the reasoning loop.
//!
//! - `ModelGateway`    — the language model (untrusted, non-deterministic)
//! - `Tool`            — an external lookup capability
//! - `DecisionParser`  — turns raw model text into a `Decision`
//! - `TraceSink`       — observational side channel, never read back
//! - `RetentionPolicy` — bounds the prompt at render time
//!
//! The controller is constructed with implementations of these; nothing is
//! read from process-wide state, so every seam can be replaced by a test
//! double.

use ponder_contracts::{
    decision::Decision,
    error::PonderResult,
    message::Message,
    tool::ToolId,
    trace::TraceEntry,
};

/// Synchronous request/response access to the language model.
pub trait ModelGateway: Send + Sync {
    /// Produce the model's next response for `prompt`.
    ///
    /// Implementations should return `PonderError::Generation` on transport
    /// failure. An empty-but-successful response is treated by the controller
    /// exactly like a failure, so implementations need not check for it.
    fn generate(&self, prompt: &[Message]) -> PonderResult<String>;
}

impl<F> ModelGateway for F
where
    F: Fn(&[Message]) -> PonderResult<String> + Send + Sync,
{
    fn generate(&self, prompt: &[Message]) -> PonderResult<String> {
        self(prompt)
    }
}

/// A text-in, text-out lookup tool.
///
/// Tools are assumed reentrant: a registry may be shared by several
/// controllers, each calling into the same tool.
pub trait Tool: Send + Sync {
    fn invoke(&self, query: &str) -> PonderResult<String>;
}

impl<F> Tool for F
where
    F: Fn(&str) -> PonderResult<String> + Send + Sync,
{
    fn invoke(&self, query: &str) -> PonderResult<String> {
        self(query)
    }
}

/// Converts raw model output into a `Decision`.
pub trait DecisionParser: Send + Sync {
    /// Parse `raw`. Tool names must resolve onto one of `available`;
    /// anything else is `Decision::Malformed`. Never fails.
    fn parse(&self, raw: &str, available: &[ToolId]) -> Decision;
}

/// Append-only recorder of trace entries.
///
/// The controller logs and otherwise ignores errors from a sink.
pub trait TraceSink: Send + Sync {
    fn record(&self, execution_id: &str, entry: &TraceEntry) -> PonderResult<()>;

    /// Called once per query after its terminal entry has been recorded.
    fn finalize(&self, execution_id: &str) -> PonderResult<()>;
}

/// Chooses which stored messages are sent to the model.
///
/// Applied to the rendered transcript each turn. The stored transcript is
/// never modified; a policy only selects.
pub trait RetentionPolicy: Send + Sync {
    /// Return the retained messages in their original order.
    fn retain(&self, messages: &[Message]) -> Vec<Message>;
}
