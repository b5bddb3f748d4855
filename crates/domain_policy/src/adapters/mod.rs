//! Adapters for external collaborators of the policy domain

pub mod openai;

pub use openai::{OpenAiChatModel, OpenAiConfig};
