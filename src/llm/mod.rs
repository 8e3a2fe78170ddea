//! Completion providers.
//!
//! The summarizer only sees [`CompletionProvider`]; the llama.cpp runtime
//! is one implementation of it.

pub mod llama;
pub mod server;

use async_trait::async_trait;

use crate::error::Result;
use crate::prompt::{Prompt, SamplingParams};

pub use llama::LlamaServerClient;
pub use server::LlamaServerProcess;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generates text for `prompt`. Failures are reported as
    /// `AppError::InferenceError`.
    async fn complete(&self, prompt: &Prompt, params: &SamplingParams) -> Result<String>;
}
