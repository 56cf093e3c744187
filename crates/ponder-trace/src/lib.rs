//! # ponder-trace
//!
//! Trace sinks for the Ponder reasoning loop.
//!
//! The controller emits a `TraceEntry` for every message it creates, every
//! iteration it starts and every query it finishes. Sinks record them; the
//! loop never reads them back.
//!
//! - [`InMemoryTraceSink`] links entries into a SHA-256 hash chain so that
//!   tampering with any recorded entry is detected by [`verify_chain`].
//! - [`FileTraceSink`] appends a plain-text rendering to a file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ponder_trace::InMemoryTraceSink;
//!
//! let sink = InMemoryTraceSink::new();
//! let controller = controller.with_trace_sink(Box::new(sink.clone()));
//! // ... run queries ...
//! assert!(sink.verify_integrity());
//! let log = sink.export_log()?;
//! ```

pub mod chain;
pub mod event;
pub mod file;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{TraceEvent, TraceLog};
pub use file::FileTraceSink;
pub use memory::InMemoryTraceSink;

// ── Tests ─────────────────────────────────────────────────────────────────────
