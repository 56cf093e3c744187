//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. execution_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of the trace entry (serde_json, no pretty-printing)

use sha2::{Digest, Sha256};

use ponder_contracts::{
    error::{PonderError, PonderResult},
    trace::TraceEntry,
};

use crate::event::TraceEvent;

/// Compute the SHA-256 hash for one trace event.
///
/// The hash commits to the event's position (`sequence`), the execution it
/// belongs to, its link to the previous event and the full entry.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_event(
    execution_id: &str,
    sequence: u64,
    entry: &TraceEntry,
    prev_hash: &str,
) -> PonderResult<String> {
    let entry_json = serde_json::to_vec(entry).map_err(|e| PonderError::TraceWriteFailed {
        reason: format!("trace entry is not serializable: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(execution_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&entry_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a hash chain.
///
/// Valid when every event links to its predecessor (or `GENESIS_HASH` for
/// the first), carries the expected sequence number, and its `this_hash`
/// matches the value recomputed from its own fields. An empty chain is
/// valid.
pub fn verify_chain(events: &[TraceEvent]) -> bool {
    let mut expected_prev = TraceEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_event(&event.execution_id, event.sequence, &event.entry, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
