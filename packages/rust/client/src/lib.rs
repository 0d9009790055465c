//! Generation Client for CourseGen.
//!
//! Wraps the hosted text-generation service (OpenAI-style chat completions)
//! and the optional Tavily web-search service. Responses are parsed into
//! JSON values; the assembler deserializes them into typed stage outputs.

pub mod chat;
pub mod parse;
pub mod prompts;
pub mod search;

pub use chat::{ChatClient, GenerationConfig};
pub use parse::extract_json;
pub use search::SearchClient;
