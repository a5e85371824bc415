//! The travel agent chatbot: one router call per turn, at most one tool call.

use super::conversation::ConversationHistory;
use crate::config::AppConfig;
use crate::error::Result;
use crate::llm::gateway::LlmGateway;
use crate::llm::gateways::OpenAIGateway;
use crate::llm::models::LlmMessage;
use crate::llm::tools::ToolRegistry;
use crate::prompts::PromptLibrary;
use crate::router::{RouterReply, ToolRouter};
use crate::tracer::TracerSystem;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const PERSONA: &str = "You are a helpful travel agent assistant. Help users plan trips, \
                           recommend destinations, and provide travel advice.";

pub const EMPTY_INPUT_REPLY: &str = "Please enter a message.";

pub const HISTORY_CLEARED_REPLY: &str = "Conversation history cleared.";

/// Chatbot holding one conversation and routing each user turn
pub struct TravelAgentBot {
    router: ToolRouter,
    seed: Vec<LlmMessage>,
    history: ConversationHistory,
    last_correlation_id: Option<String>,
}

impl TravelAgentBot {
    /// Create a bot whose history starts with the persona and the router guidance
    pub fn new(router: ToolRouter) -> Result<Self> {
        let mut seed = vec![LlmMessage::system(PERSONA)];
        seed.extend(router.seed_messages()?);

        let mut bot = Self {
            router,
            seed,
            history: ConversationHistory::new(),
            last_correlation_id: None,
        };
        bot.reset();
        Ok(bot)
    }

    /// Wire the OpenAI gateway, prompts and the four travel tools from `config`
    pub fn from_config(config: &AppConfig, tracer: Option<Arc<TracerSystem>>) -> Result<Self> {
        let gateway: Arc<dyn LlmGateway> = Arc::new(OpenAIGateway::with_config(config.openai()));
        let prompts = Arc::new(config.prompt_library()?);
        Self::with_gateway(gateway, prompts, config, tracer)
    }

    /// Like [`TravelAgentBot::from_config`] but with a caller-supplied gateway and prompts
    pub fn with_gateway(
        gateway: Arc<dyn LlmGateway>,
        prompts: Arc<PromptLibrary>,
        config: &AppConfig,
        tracer: Option<Arc<TracerSystem>>,
    ) -> Result<Self> {
        let registry =
            ToolRegistry::travel_tools(gateway.clone(), prompts.clone(), config.flight_search());
        let mut router = ToolRouter::new(gateway, prompts, registry);
        if let Some(tracer) = tracer {
            router = router.with_tracer(tracer);
        }
        Self::new(router)
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn router(&self) -> &ToolRouter {
        &self.router
    }

    /// Correlation id of the most recent non-empty turn
    pub fn last_correlation_id(&self) -> Option<&str> {
        self.last_correlation_id.as_deref()
    }

    /// Handle one user turn and return the text shown to the user.
    ///
    /// The router's text reply is returned as is; a tool call is dispatched and its
    /// output returned. Both the call and its result are kept in the history.
    pub async fn respond(&mut self, input: &str) -> Result<String> {
        if input.trim().is_empty() {
            return Ok(EMPTY_INPUT_REPLY.to_string());
        }

        let correlation_id = Uuid::new_v4().to_string();
        self.last_correlation_id = Some(correlation_id.clone());
        debug!(correlation_id = %correlation_id, "Handling user turn");

        self.history.add_message(LlmMessage::user(input));

        let reply = self.router.route(self.history.messages(), &correlation_id).await?;
        match reply {
            RouterReply::Text(text) => {
                self.history.add_message(LlmMessage::assistant(text.clone()));
                Ok(text)
            }
            RouterReply::ToolCall(call) => {
                self.history.add_message(LlmMessage::assistant_tool_call(call.clone()));

                match self.router.dispatch(&call, &correlation_id).await {
                    Ok(result) => {
                        info!(tool = %call.name, correlation_id = %correlation_id, "Tool answered");
                        self.history.add_message(LlmMessage::tool_result(&call, result.clone()));
                        Ok(result)
                    }
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "Tool call failed");
                        let error = format!("Error: {}", e);
                        self.history.add_message(LlmMessage::tool_result(&call, error));
                        Err(e)
                    }
                }
            }
        }
    }

    /// Drop the conversation, keeping only the seed messages
    pub fn clear_history(&mut self) -> String {
        self.reset();
        HISTORY_CLEARED_REPLY.to_string()
    }

    fn reset(&mut self) {
        self.history.clear();
        for message in &self.seed {
            self.history.add_message(message.clone());
        }
    }
}
