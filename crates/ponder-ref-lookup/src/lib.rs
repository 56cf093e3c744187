//! # ponder-ref-lookup
//!
//! Offline lookup reference runtime for the Ponder reasoning loop.
//!
//! Wires the real controller, response parser and trace sinks to two tools
//! over fixture data (an encyclopedia and a web search index) and to
//! scripted model gateways. Scenarios:
//!
//! 1. **Capital Lookup**: structured JSON happy path.
//! 2. **Tool Failure Containment**: a failed lookup becomes an observation
//!    and the model switches tools (line-oriented replies).
//! 3. **Self-Correction**: malformed replies are fed back and the model
//!    recovers.
//! 4. **Iteration Exhaustion**: a degraded answer with partial findings.
//! 5. **Gateway Outage**: retry, terminal failure, and `reset()`.
//!
//! All data is hardcoded. No external API calls are made.

pub mod gateway;
pub mod mock_data;
pub mod scenarios;
pub mod tools;

pub use gateway::{LookupGateway, ScriptedGateway};
pub use tools::{reference_registry, EncyclopediaTool, WebSearchTool};
