//! The travel agent chatbot and its conversation buffer.

pub mod bot;
pub mod conversation;

pub use bot::{TravelAgentBot, EMPTY_INPUT_REPLY, HISTORY_CLEARED_REPLY, PERSONA};
pub use conversation::ConversationHistory;
