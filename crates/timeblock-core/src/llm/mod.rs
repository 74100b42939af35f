//! Language model access for the planner.
//!
//! The planner only sees [`LlmClient`]; [`OpenAiCompatClient`] is the one
//! network implementation shipped with the crate.

mod client;
mod error;
mod json;
mod openai;
mod types;

pub use client::{chat_json, parse_json, LlmClient};
pub use error::LlmError;
pub use json::extract_json;
pub use openai::OpenAiCompatClient;
pub use types::{Message, Role};
