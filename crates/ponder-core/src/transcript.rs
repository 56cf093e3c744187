//! The append-only conversation log.

use ponder_contracts::{
    error::{PonderError, PonderResult},
    message::{Message, Role},
};

/// Ordered, role-tagged history forming the model's context.
///
/// There is no operation that removes or edits a message. `render()` is the
/// exact sequence the next prompt is built from.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript whose first message is `prompt` with the system role.
    pub fn seeded(prompt: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.append(Role::System, prompt);
        transcript
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    pub fn render(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> PonderResult<&Message> {
        self.messages.last().ok_or(PonderError::EmptyTranscript)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_on_empty_transcript_fails() {
        let transcript = Transcript::new();
        assert!(matches!(transcript.last(), Err(PonderError::EmptyTranscript)));
    }

    #[test]
    fn render_preserves_insertion_order_without_dedup() {
        let mut transcript = Transcript::seeded("prompt");
        transcript.append(Role::User, "q");
        transcript.append(Role::Assistant, "same");
        transcript.append(Role::Assistant, "same");

        let rendered = transcript.render();
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[0], Message::system("prompt"));
        assert_eq!(rendered[1], Message::user("q"));
        assert_eq!(rendered[2], rendered[3]);
        assert_eq!(transcript.last().unwrap().content(), "same");
    }

    #[test]
    fn appending_never_changes_earlier_messages() {
        let mut transcript = Transcript::new();
        transcript.append(Role::User, "first");
        let snapshot = transcript.render().to_vec();

        for i in 0..5 {
            let before = transcript.len();
            transcript.append(Role::System, format!("observation {i}"));
            assert_eq!(transcript.len(), before + 1);
        }

        assert_eq!(&transcript.render()[..1], snapshot.as_slice());
    }
}
