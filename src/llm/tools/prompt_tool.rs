//! Tools answered by a single templated LLM call.
//!
//! Destination info, itinerary and packing list generation differ only in their
//! docstring, parameters and prompt template, so they share [`PromptTool`].

use crate::error::Result;
use crate::llm::gateway::LlmGateway;
use crate::llm::gateways::TracingGateway;
use crate::llm::tools::tool::{function_to_tool, required_str, LlmTool, ParamType, ToolDescriptor};
use crate::prompts::{PromptLibrary, INFO_PROMPT, ITINERARY_PROMPT, PACKING_PROMPT};
use crate::tracer::TracerSystem;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const TRAVEL_INFO_DOC: &str = "
    Retrieves travel information for a specified destination using OpenAI's API.

    Args:
        destination (str): The name of the destination to get information about

    Returns:
        str: Travel information including highlights and key details about the destination
";

const ITINERARY_DOC: &str = "
    Creates a travel itinerary for a destination between specified dates.

    Args:
        destination (str): The destination city/location
        checkin_date (str): Start date in YYYY-MM-DD format
        checkout_date (str): End date in YYYY-MM-DD format

    Returns:
        str: Generated itinerary for the trip
";

const PACKING_LIST_DOC: &str = "
    Generates a packing list for a trip based on destination and dates.

    Args:
        destination (str): The destination city/location
        checkin_date (str): Trip start date in YYYY-MM-DD format
        checkout_date (str): Trip end date in YYYY-MM-DD format

    Returns:
        str: Customized packing list for the trip
";

const DESTINATION: &[(&str, ParamType)] = &[("destination", ParamType::String)];

const TRIP: &[(&str, ParamType)] = &[
    ("destination", ParamType::String),
    ("checkin_date", ParamType::String),
    ("checkout_date", ParamType::String),
];

/// A tool that fills a prompt template with its arguments and returns the LLM's reply
#[derive(Clone)]
pub struct PromptTool {
    name: &'static str,
    docstring: &'static str,
    params: &'static [(&'static str, ParamType)],
    prompt_name: &'static str,
    gateway: Arc<dyn LlmGateway>,
    prompts: Arc<PromptLibrary>,
    tracer: Option<Arc<TracerSystem>>,
}

impl PromptTool {
    /// `get_travel_info(destination)`
    pub fn travel_info(gateway: Arc<dyn LlmGateway>, prompts: Arc<PromptLibrary>) -> Self {
        Self {
            name: "get_travel_info",
            docstring: TRAVEL_INFO_DOC,
            params: DESTINATION,
            prompt_name: INFO_PROMPT,
            gateway,
            prompts,
            tracer: None,
        }
    }

    /// `create_itinerary(destination, checkin_date, checkout_date)`
    pub fn itinerary(gateway: Arc<dyn LlmGateway>, prompts: Arc<PromptLibrary>) -> Self {
        Self {
            name: "create_itinerary",
            docstring: ITINERARY_DOC,
            params: TRIP,
            prompt_name: ITINERARY_PROMPT,
            gateway,
            prompts,
            tracer: None,
        }
    }

    /// `create_packing_list(destination, checkin_date, checkout_date)`
    pub fn packing_list(gateway: Arc<dyn LlmGateway>, prompts: Arc<PromptLibrary>) -> Self {
        Self {
            name: "create_packing_list",
            docstring: PACKING_LIST_DOC,
            params: TRIP,
            prompt_name: PACKING_PROMPT,
            gateway,
            prompts,
            tracer: None,
        }
    }
}

#[async_trait]
impl LlmTool for PromptTool {
    async fn run(&self, args: &HashMap<String, Value>, correlation_id: &str) -> Result<String> {
        let mut variables = HashMap::with_capacity(self.params.len());
        for (param, _) in self.params {
            variables.insert(param.to_string(), required_str(args, param)?.to_string());
        }

        let prompt = self.prompts.get(self.prompt_name)?.format(&variables)?;
        debug!(
            tool = self.name,
            prompt = self.prompt_name,
            model = %prompt.model,
            "Calling prompt"
        );

        let gateway =
            TracingGateway::wrap(&self.gateway, self.tracer.as_ref(), self.name, correlation_id);
        let response =
            gateway.complete(&prompt.model, &prompt.messages, None, &prompt.config).await?;

        Ok(response.content.unwrap_or_default())
    }

    fn descriptor(&self) -> ToolDescriptor {
        function_to_tool(self.name, self.docstring, self.params)
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name
    }

    fn set_tracer(&mut self, tracer: Arc<TracerSystem>) {
        self.tracer = Some(tracer);
    }
}
