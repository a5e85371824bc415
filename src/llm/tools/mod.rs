pub mod flight_search;
pub mod prompt_tool;
pub mod registry;
mod tool;

pub use flight_search::FlightSearchTool;
pub use prompt_tool::PromptTool;
pub use registry::ToolRegistry;
pub use tool::{function_to_tool, FunctionDescriptor, LlmTool, ParamType, ToolDescriptor};
