//! Caller-supplied cancellation for gateway and tool calls.
//!
//! The loop itself has no notion of wall-clock time. Wrapping a gateway or
//! tool in `Cancellable` makes its calls fail with `PonderError::Cancelled`
//! once the token is triggered or its deadline passes. The controller treats
//! a cancelled generation like any other gateway failure, and a cancelled
//! tool call like any other tool failure.
//!
//! Calls are blocking, so a token is checked before each call is issued and
//! again when it returns; a call already in flight is not interrupted.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use ponder_contracts::{
    error::{PonderError, PonderResult},
    message::Message,
};

use crate::traits::{ModelGateway, Tool};

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also trips once `timeout` has elapsed from now. A
    /// timeout too large to represent as an instant never expires.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Trip the token. Every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn check(&self, what: &str) -> PonderResult<()> {
        if self.flag.load(Ordering::SeqCst) {
            return Err(PonderError::Cancelled { reason: format!("{what} cancelled by caller") });
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(PonderError::Cancelled { reason: format!("{what} exceeded its deadline") });
        }
        Ok(())
    }
}

/// Wraps a `ModelGateway` or `Tool` so its calls honour a token.
pub struct Cancellable<T> {
    inner: T,
    token: CancellationToken,
}

impl<T> Cancellable<T> {
    pub fn new(inner: T, token: CancellationToken) -> Self {
        Self { inner, token }
    }
}

impl<T: ModelGateway> ModelGateway for Cancellable<T> {
    fn generate(&self, prompt: &[Message]) -> PonderResult<String> {
        self.token.check("generation")?;
        let text = self.inner.generate(prompt)?;
        self.token.check("generation")?;
        Ok(text)
    }
}

impl<T: Tool> Tool for Cancellable<T> {
    fn invoke(&self, query: &str) -> PonderResult<String> {
        self.token.check("tool call")?;
        let text = self.inner.invoke(query)?;
        self.token.check("tool call")?;
        Ok(text)
    }
}
