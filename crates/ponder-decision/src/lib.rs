//! # ponder-decision
//!
//! Decision parsing for the Ponder reasoning loop.
//!
//! This crate provides [`ResponseParser`], which implements the
//! [`ponder_core::traits::DecisionParser`] trait. Model output is free text,
//! so the parser is deliberately forgiving:
//!
//! 1. **Fences** are stripped (```` ```json ````, bare language tags).
//! 2. **Structured** replies are JSON objects validated with the
//!    `jsonschema` crate, e.g. `{"action": {"name": "wikipedia", "input": "Paris"}}`
//!    or `{"answer": "Paris"}`.
//! 3. **Line-oriented** replies use `Thought:` / `Action: tool: input` /
//!    `Answer:` lines.
//!
//! Unparseable text and unknown tools become `Decision::Malformed`; the
//! parser itself never errors.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ponder_contracts::ToolId;
//! use ponder_core::traits::DecisionParser;
//! use ponder_decision::ResponseParser;
//!
//! let parser = ResponseParser::new();
//! let decision = parser.parse("Action: wikipedia: Paris", &[ToolId::Wikipedia]);
//! ```

pub mod fence;
mod lines;
pub mod parser;
pub mod schema;

pub use fence::strip_fences;
pub use parser::ResponseParser;
