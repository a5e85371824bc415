//! A travel agent chatbot built on LLM tool routing.
//!
//! Each user turn makes one router call that either answers directly or selects one of
//! four tools (destination info, flight search, itinerary, packing list) with extracted
//! arguments. The tool's output is folded back into the conversation.

pub mod agent;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod prompts;
pub mod router;
pub mod tracer;

pub use error::{Result, TravelAgentError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agent::{ConversationHistory, TravelAgentBot};
    pub use crate::config::AppConfig;
    pub use crate::error::{Result, TravelAgentError};
    pub use crate::llm::gateways::OpenAIGateway;
    pub use crate::llm::tools::{FunctionDescriptor, LlmTool, ToolDescriptor, ToolRegistry};
    pub use crate::llm::{CompletionConfig, LlmGateway, LlmMessage, LlmToolCall, MessageRole};
    pub use crate::prompts::PromptLibrary;
    pub use crate::router::{RouterReply, ToolRouter};
    pub use crate::tracer::{setup_tracing, TracerSystem};
}
