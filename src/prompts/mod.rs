//! Prompt templates used by the router and the LLM-backed tools.
//!
//! Templates are plain JSON documents (model, invocation parameters, messages with
//! `{{variable}}` placeholders). [`PromptLibrary::with_defaults`] ships the travel agent
//! prompts; a directory of JSON files can override them.

pub mod library;
pub mod template;

pub use library::{PromptLibrary, INFO_PROMPT, ITINERARY_PROMPT, PACKING_PROMPT, ROUTER_PROMPT};
pub use template::{FormattedPrompt, PromptMessage, PromptTemplate};
