//! # ponder-core
//!
//! The bounded Reason → Act → Observe loop controller.
//!
//! This crate provides:
//! - The seam traits (`ModelGateway`, `Tool`, `DecisionParser`, `TraceSink`,
//!   `RetentionPolicy`)
//! - `Transcript`, the append-only conversation log
//! - `ToolRegistry`, closed-identifier dispatch that never fails
//! - Render-time retention policies and cancellation wrappers
//! - The `Controller` state machine that wires them together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ponder_core::{Controller, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(ToolId::Wikipedia, encyclopedia);
//! let mut controller = Controller::new(Box::new(gateway), registry, Box::new(parser), LoopConfig::default());
//! let answer = controller.execute("What is the capital of France?")?;
//! ```

pub mod cancel;
pub mod controller;
pub mod prompt;
pub mod registry;
pub mod retention;
pub mod traits;
pub mod transcript;

pub use cancel::{Cancellable, CancellationToken};
pub use controller::Controller;
pub use registry::ToolRegistry;
pub use retention::{CharBudget, KeepAll, RecentWindow};
pub use transcript::Transcript;
