//! Iteration accounting and query-level results.
//!
//! `IterationState` bounds the loop. `RunReport` is what the controller
//! returns to the caller once a query reaches a terminal state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::message::ExecutionId;

/// Counts consumed reasoning iterations against a fixed bound.
///
/// Invariant: `0 <= current <= max`. An iteration is consumed by every
/// dispatched action and every malformed decision; a final answer never
/// consumes one. `try_advance` refuses to move past `max`, which is the
/// controller's signal to terminate as exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationState {
    current: u32,
    max: u32,
}

impl IterationState {
    pub fn new(max: u32) -> Self {
        Self { current: 0, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn remaining(&self) -> u32 {
        self.max - self.current
    }

    /// Consume one iteration. Returns `false`, leaving the state untouched,
    /// when doing so would exceed `max`.
    pub fn try_advance(&mut self) -> bool {
        if self.current < self.max {
            self.current += 1;
            true
        } else {
            false
        }
    }
}

/// How a query ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The model produced a final answer.
    Answered,
    /// The iteration bound was reached first; the answer is degraded.
    Exhausted,
    /// The model gateway kept failing; the answer describes the failure.
    GatewayFailed,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Answered => "answered",
            Self::Exhausted => "exhausted",
            Self::GatewayFailed => "gateway_failed",
        };
        f.write_str(s)
    }
}

/// The outcome of one `Controller::run` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub execution_id: ExecutionId,
    /// The final answer, or a clearly labelled degraded/error answer.
    pub answer: String,
    pub termination: Termination,
    /// Iterations consumed (actions dispatched plus malformed decisions).
    pub iterations: u32,
    /// Tool invocations actually issued.
    pub tool_invocations: u32,
    /// Transcript length when the query terminated.
    pub transcript_len: usize,
}

impl RunReport {
    pub fn is_answered(&self) -> bool {
        self.termination == Termination::Answered
    }
}
