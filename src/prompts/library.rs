//! Named prompt templates with optional on-disk overrides.

use super::template::{PromptMessage, PromptTemplate};
use crate::error::{Result, TravelAgentError};
use crate::llm::models::MessageRole;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

pub const ROUTER_PROMPT: &str = "travel-agent-router";
pub const INFO_PROMPT: &str = "travel-agent-info";
pub const ITINERARY_PROMPT: &str = "travel-agent-itinerary";
pub const PACKING_PROMPT: &str = "travel-agent-packing";

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Collection of prompt templates keyed by name
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    templates: BTreeMap<String, PromptTemplate>,
}

impl PromptLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library holding the built-in travel agent prompts
    pub fn with_defaults() -> Self {
        let mut library = Self::new();
        for template in default_templates() {
            library.insert(template);
        }
        library
    }

    /// Add or replace a template
    pub fn insert(&mut self, template: PromptTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Look up a template by name
    pub fn get(&self, name: &str) -> Result<&PromptTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| TravelAgentError::PromptNotFound(name.to_string()))
    }

    /// Template names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Overlay every `*.json` template found in `dir`, returning how many were loaded
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let pattern = dir.as_ref().join("*.json");
        let pattern = pattern.to_string_lossy();
        let paths = glob::glob(&pattern)
            .map_err(|e| TravelAgentError::ConfigError(format!("Invalid prompts path: {}", e)))?;

        let mut loaded = 0;
        for entry in paths {
            let path = entry.map_err(|e| TravelAgentError::IoError(e.into_error()))?;
            let raw = std::fs::read_to_string(&path)?;
            let template: PromptTemplate = serde_json::from_str(&raw)?;
            debug!(prompt = %template.name, path = %path.display(), "Loaded prompt template");
            self.insert(template);
            loaded += 1;
        }

        info!(count = loaded, dir = %dir.as_ref().display(), "Loaded prompt overrides");
        Ok(loaded)
    }

    /// Write each template to `dir/<name>.json`, creating the directory if needed
    pub fn export_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<std::path::PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.templates.len());
        for (name, template) in &self.templates {
            let path = dir.join(format!("{}.json", name));
            std::fs::write(&path, serde_json::to_string_pretty(template)?)?;
            written.push(path);
        }
        Ok(written)
    }
}

fn default_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            name: ROUTER_PROMPT.to_string(),
            description: "A router prompt for the travel agent.".to_string(),
            model: DEFAULT_MODEL.to_string(),
            messages: vec![PromptMessage::new(
                MessageRole::System,
                "You are a travel agent. You are given a user's request and you need to \
                 route it to the appropriate tool.",
            )],
            temperature: None,
            max_tokens: None,
        },
        PromptTemplate {
            name: INFO_PROMPT.to_string(),
            description: "Destination overview for a traveller.".to_string(),
            model: DEFAULT_MODEL.to_string(),
            messages: vec![
                PromptMessage::new(
                    MessageRole::System,
                    "You are an experienced travel guide. Give accurate, practical and \
                     concise information about travel destinations.",
                ),
                PromptMessage::new(
                    MessageRole::User,
                    "Tell me about {{destination}}. Cover the highlights, the best time to \
                     visit, getting around, local customs and any key details a first-time \
                     visitor should know.",
                ),
            ],
            temperature: Some(0.7),
            max_tokens: None,
        },
        PromptTemplate {
            name: ITINERARY_PROMPT.to_string(),
            description: "Day-by-day itinerary for a stay.".to_string(),
            model: DEFAULT_MODEL.to_string(),
            messages: vec![
                PromptMessage::new(
                    MessageRole::System,
                    "You are a travel planner who builds realistic day-by-day itineraries.",
                ),
                PromptMessage::new(
                    MessageRole::User,
                    "Create an itinerary for a trip to {{destination}}, arriving on \
                     {{checkin_date}} and leaving on {{checkout_date}}. Organize it by day \
                     with morning, afternoon and evening suggestions.",
                ),
            ],
            temperature: Some(0.7),
            max_tokens: None,
        },
        PromptTemplate {
            name: PACKING_PROMPT.to_string(),
            description: "Packing list tailored to destination and dates.".to_string(),
            model: DEFAULT_MODEL.to_string(),
            messages: vec![
                PromptMessage::new(
                    MessageRole::System,
                    "You are a seasoned traveller who writes practical packing lists.",
                ),
                PromptMessage::new(
                    MessageRole::User,
                    "Write a packing list for a trip to {{destination}} from {{checkin_date}} \
                     to {{checkout_date}}. Take the expected weather and typical activities \
                     into account and group items by category.",
                ),
            ],
            temperature: Some(0.5),
            max_tokens: None,
        },
    ]
}
