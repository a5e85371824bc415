//! Ordered log of role-tagged messages replayed on every router call.

use crate::llm::models::LlmMessage;

/// Append-only conversation buffer; only [`ConversationHistory::clear`] removes messages
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<LlmMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, message: LlmMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&LlmMessage> {
        self.messages.last()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
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
    use crate::llm::models::MessageRole;

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut history = ConversationHistory::new();
        history.add_message(LlmMessage::system("persona"));
        history.add_message(LlmMessage::user("Where to?"));
        history.add_message(LlmMessage::assistant("Lisbon."));

        let roles: Vec<MessageRole> = history.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::System, MessageRole::User, MessageRole::Assistant]);
        assert_eq!(history.last().unwrap().content.as_deref(), Some("Lisbon."));
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new();
        history.add_message(LlmMessage::user("hello"));
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }
}
