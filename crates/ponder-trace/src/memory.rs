//! In-memory, hash-chained implementation of `TraceSink`.
//!
//! `InMemoryTraceSink` keeps every event in a `Vec` behind an
//! `Arc<Mutex<_>>`. Clones share the same chain, so a caller can hand one
//! clone to a controller and keep another to export or verify the log.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use ponder_contracts::{
    error::{PonderError, PonderResult},
    trace::TraceEntry,
};
use ponder_core::traits::TraceSink;

use crate::{
    chain::{hash_event, verify_chain},
    event::{TraceEvent, TraceLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct InMemoryState {
    /// All events written so far, in append order.
    pub(crate) events: Vec<TraceEvent>,

    /// The next sequence number to assign.
    pub(crate) sequence: u64,

    /// `this_hash` of the last event, or `GENESIS_HASH` before any write.
    pub(crate) last_hash: String,

    pub(crate) finalized: Vec<String>,
}

// ── Public sink ───────────────────────────────────────────────────────────────

/// An append-only trace sink backed by a SHA-256 hash chain.
#[derive(Clone)]
pub struct InMemoryTraceSink {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl Default for InMemoryTraceSink {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTraceSink {
    pub fn new() -> Self {
        let state = InMemoryState {
            events: Vec::new(),
            sequence: 0,
            last_hash: TraceEvent::GENESIS_HASH.to_string(),
            finalized: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Snapshot of every event recorded so far.
    pub fn export_log(&self) -> PonderResult<TraceLog> {
        let state = self.lock()?;
        let terminal_hash = state
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        Ok(TraceLog {
            events: state.events.clone(),
            finalized: state.finalized.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        })
    }

    /// True when the in-memory chain is intact. A poisoned lock counts as
    /// a failed check.
    pub fn verify_integrity(&self) -> bool {
        match self.lock() {
            Ok(state) => verify_chain(&state.events),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> PonderResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| PonderError::TraceWriteFailed {
            reason: format!("trace state lock poisoned: {e}"),
        })
    }
}

// ── TraceSink impl ────────────────────────────────────────────────────────────

impl TraceSink for InMemoryTraceSink {
    fn record(&self, execution_id: &str, entry: &TraceEntry) -> PonderResult<()> {
        let mut state = self.lock()?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_event(execution_id, sequence, entry, &prev_hash)?;

        state.events.push(TraceEvent {
            sequence,
            execution_id: execution_id.to_string(),
            entry: entry.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;

        debug!(execution_id = %execution_id, sequence, "trace entry recorded");
        Ok(())
    }

    fn finalize(&self, execution_id: &str) -> PonderResult<()> {
        let mut state = self.lock()?;
        state.finalized.push(execution_id.to_string());

        info!(
            execution_id = %execution_id,
            event_count = state.events.len(),
            terminal_hash = %state.last_hash,
            "trace finalized"
        );
        Ok(())
    }
}
