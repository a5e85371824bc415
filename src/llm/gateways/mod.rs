pub mod openai;
pub mod openai_messages_adapter;
pub mod tracing_gateway;

pub use openai::{OpenAIConfig, OpenAIGateway};
pub use tracing_gateway::TracingGateway;
