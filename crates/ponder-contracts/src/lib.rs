//! # ponder-contracts
//!
//! Shared types, identifiers, and error contracts for the Ponder reasoning
//! loop.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions, identifier parsing and error types.

pub mod config;
pub mod decision;
pub mod error;
pub mod execution;
pub mod message;
pub mod tool;
pub mod trace;

pub use config::{LoopConfig, ObservationPolicy};
pub use decision::Decision;
pub use error::{PonderError, PonderResult};
pub use execution::{IterationState, RunReport, Termination};
pub use message::{ExecutionId, Message, Role};
pub use tool::{Observation, ToolId};
pub use trace::{TraceEntry, TraceKind};
