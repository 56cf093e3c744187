//! Trace event and log types.
//!
//! `TraceEvent` wraps a `TraceEntry` with sequence numbering and the SHA-256
//! hashes that make tampering detectable. `TraceLog` is the snapshot
//! produced by `InMemoryTraceSink::export_log`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ponder_contracts::trace::TraceEntry;

/// One entry in the hash chain.
///
/// Modifying any field, including those of the embedded `entry`,
/// invalidates `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The execution (conversation) that produced the entry.
    pub execution_id: String,

    pub entry: TraceEntry,

    /// Hash of the previous event, or `GENESIS_HASH` for the first event.
    pub prev_hash: String,

    /// Hash over (execution_id, sequence, prev_hash, canonical JSON of entry).
    pub this_hash: String,
}

impl TraceEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A snapshot of everything a sink has recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLog {
    /// All events in chain order (sequence 0 first).
    pub events: Vec<TraceEvent>,

    /// Executions for which `finalize` has been called, in call order.
    /// One execution appears once per finalized query.
    pub finalized: Vec<String>,

    /// Wall-clock time (UTC) of the export.
    pub exported_at: DateTime<Utc>,

    /// `this_hash` of the last event. Empty if the log is empty.
    pub terminal_hash: String,
}

impl TraceLog {
    /// Events belonging to one execution, in chain order.
    pub fn events_for<'a>(&'a self, execution_id: &'a str) -> impl Iterator<Item = &'a TraceEvent> {
        self.events.iter().filter(move |e| e.execution_id == execution_id)
    }

    /// Plain-text rendering of one execution, one line per entry.
    pub fn render(&self, execution_id: &str) -> String {
        self.events_for(execution_id)
            .map(|e| e.entry.render_line())
            .collect()
    }
}
