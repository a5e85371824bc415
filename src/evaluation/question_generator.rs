//! LLM-generated test questions for the router and the full agent.

use super::dataset::{
    write_csv, HardQuestion, RouterFunctionCase, RouterParameterCase, HARD_QUESTIONS_FILE,
    ROUTER_FUNCTIONS_FILE, ROUTER_PARAMETERS_FILE,
};
use crate::error::{Result, TravelAgentError};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::gateways::TracingGateway;
use crate::llm::models::LlmMessage;
use crate::tracer::TracerSystem;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_GENERATOR_MODEL: &str = "gpt-4o";

const SOURCE: &str = "QuestionGenerator";

const GENERATOR_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates test questions for a travel agent chatbot.";

const TOOL_OVERVIEW: &str = "Generate 3 user questions for each of the following travel agent tools:

1. get_travel_info - Retrieves travel information for a specified destination
2. flight_search - Searches for available flights between two locations
3. create_itinerary - Creates a travel itinerary for a destination between specified dates
4. create_packing_list - Generates a packing list for a trip based on destination and dates
";

const ROUTER_QUESTIONS_INSTRUCTIONS: &str = "
Format the response as a JSON object with tool names as keys and arrays of questions as values,
as well as a list of expected parameters and their values.

Try and trick the model into using the wrong tool.

Expected output:
{
    \"questions\": [
        {
            \"question\": \"user_question\",
            \"expected_output\": \"tool_name\",
            \"parameters\": {\"parameter1\": \"value1\", \"parameter2\": \"value2\", \"parameter3\": \"value3\"}
        }
    ]
}
";

const HARD_QUESTIONS_INSTRUCTIONS: &str = "
The questions should be designed to test the agent's ability to handle complex queries and
provide accurate and helpful responses.

Output a json object with a list of questions. Do not include a key or mention of the tool names, just the list of questions.
";

/// One generated router test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouterQuestion {
    pub question: String,
    /// Name of the tool the router should choose
    pub expected_output: String,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RouterQuestionSet {
    pub questions: Vec<RouterQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HardQuestionSet {
    pub questions: Vec<String>,
}

impl RouterQuestionSet {
    /// Split into the function-selection and parameter-extraction datasets
    pub fn into_cases(self) -> Result<(Vec<RouterFunctionCase>, Vec<RouterParameterCase>)> {
        let mut functions = Vec::with_capacity(self.questions.len());
        let mut parameters = Vec::with_capacity(self.questions.len());

        for q in self.questions {
            parameters.push(RouterParameterCase {
                question: q.question.clone(),
                parameters: serde_json::to_string(&q.parameters)?,
            });
            functions.push(RouterFunctionCase {
                expected_output: q.expected_output,
                question: q.question,
            });
        }

        Ok((functions, parameters))
    }
}

/// Generates question datasets with a JSON-mode LLM call
pub struct QuestionGenerator {
    gateway: Arc<dyn LlmGateway>,
    model: String,
    tracer: Option<Arc<TracerSystem>>,
}

impl QuestionGenerator {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self::with_model(gateway, DEFAULT_GENERATOR_MODEL)
    }

    pub fn with_model(gateway: Arc<dyn LlmGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            tracer: None,
        }
    }

    /// Record each generation call in `tracer`, one correlation id per call
    pub fn with_tracer(mut self, tracer: Arc<TracerSystem>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    async fn generate_object<T>(&self, instructions: &str) -> Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = serde_json::to_value(schemars::schema_for!(T))?;
        let messages = [
            LlmMessage::system(GENERATOR_SYSTEM_PROMPT),
            LlmMessage::user(format!("{}{}", TOOL_OVERVIEW, instructions)),
        ];

        let correlation_id = Uuid::new_v4().to_string();
        let gateway =
            TracingGateway::wrap(&self.gateway, self.tracer.as_ref(), SOURCE, &correlation_id);
        let value = gateway
            .complete_json(&self.model, &messages, Some(schema), &CompletionConfig::default())
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Three questions per tool, each with its expected tool and arguments
    pub async fn router_questions(&self) -> Result<RouterQuestionSet> {
        let set: RouterQuestionSet = self.generate_object(ROUTER_QUESTIONS_INSTRUCTIONS).await?;
        if set.questions.is_empty() {
            return Err(TravelAgentError::ApiError("Generator returned no questions".to_string()));
        }
        info!(count = set.questions.len(), "Generated router questions");
        Ok(set)
    }

    /// Multi-part questions for end-to-end runs of the agent
    pub async fn hard_questions(&self) -> Result<Vec<String>> {
        let set: HardQuestionSet = self.generate_object(HARD_QUESTIONS_INSTRUCTIONS).await?;
        info!(count = set.questions.len(), "Generated hard agent questions");
        Ok(set.questions)
    }

    /// Generate router questions and write both router datasets into `dir`
    pub async fn write_router_datasets(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let (functions, parameters) = self.router_questions().await?.into_cases()?;

        let functions_path = dir.as_ref().join(ROUTER_FUNCTIONS_FILE);
        let parameters_path = dir.as_ref().join(ROUTER_PARAMETERS_FILE);
        write_csv(&functions_path, &functions)?;
        write_csv(&parameters_path, &parameters)?;

        Ok(vec![functions_path, parameters_path])
    }

    /// Generate hard questions and write them into `dir`
    pub async fn write_hard_questions(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let rows: Vec<HardQuestion> = self
            .hard_questions()
            .await?
            .into_iter()
            .map(|questions| HardQuestion { questions })
            .collect();

        let path = dir.as_ref().join(HARD_QUESTIONS_FILE);
        write_csv(&path, &rows)?;
        Ok(path)
    }
}
