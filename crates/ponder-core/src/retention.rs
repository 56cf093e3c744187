//! Render-time retention policies.
//!
//! Each policy selects a subsequence of the stored transcript to send to the
//! model. The leading system prompt, when present, is pinned; the most
//! recent message is always kept so the model sees what it is responding to.

use ponder_contracts::message::{Message, Role};

use crate::traits::RetentionPolicy;

/// Send the whole transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl RetentionPolicy for KeepAll {
    fn retain(&self, messages: &[Message]) -> Vec<Message> {
        messages.to_vec()
    }
}

/// Drop the oldest messages after the system prompt until the total content
/// length, counted in characters, fits within `max_chars`.
#[derive(Debug, Clone, Copy)]
pub struct CharBudget {
    pub max_chars: usize,
}

impl CharBudget {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl RetentionPolicy for CharBudget {
    fn retain(&self, messages: &[Message]) -> Vec<Message> {
        let (pinned, rest) = split_pinned(messages);
        let mut budget = self
            .max_chars
            .saturating_sub(pinned.iter().map(char_len).sum());

        // Walk backwards from the newest message, keeping what fits.
        let mut keep_from = rest.len();
        for (idx, message) in rest.iter().enumerate().rev() {
            let len = char_len(message);
            if len > budget && keep_from < rest.len() {
                break;
            }
            budget = budget.saturating_sub(len);
            keep_from = idx;
        }

        pinned.iter().chain(&rest[keep_from..]).cloned().collect()
    }
}

/// Keep the system prompt plus the `max_messages` most recent messages.
#[derive(Debug, Clone, Copy)]
pub struct RecentWindow {
    pub max_messages: usize,
}

impl RecentWindow {
    pub fn new(max_messages: usize) -> Self {
        Self { max_messages }
    }
}

impl RetentionPolicy for RecentWindow {
    fn retain(&self, messages: &[Message]) -> Vec<Message> {
        let (pinned, rest) = split_pinned(messages);
        let window = self.max_messages.max(1).min(rest.len());
        pinned.iter().chain(&rest[rest.len() - window..]).cloned().collect()
    }
}

fn char_len(message: &Message) -> usize {
    message.content().chars().count()
}

/// Split off the seeded system prompt (the first message, if it is a system
/// message and not also the newest).
fn split_pinned(messages: &[Message]) -> (&[Message], &[Message]) {
    match messages.first() {
        Some(first) if first.role() == Role::System && messages.len() > 1 => messages.split_at(1),
        _ => (&messages[..0], messages),
    }
}
