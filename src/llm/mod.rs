//! External extraction service: client contract, HTTP client, prompt and
//! response handling
//!
//! The service is an Ollama-compatible `/api/generate` endpoint. Everything
//! above this module talks to it through [`LlmClient`], so tests run against
//! [`MockClient`].

mod client;
mod ollama;
mod prompt;
mod response;

pub use client::{GenerateRequest, GenerateResponse, LlmClient, LlmError, MockClient};
pub use ollama::OllamaClient;
pub use prompt::{build_prompt, output_schema};
pub use response::{extract_json, parse_items};
