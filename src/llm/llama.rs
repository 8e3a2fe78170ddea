use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::llm::CompletionProvider;
use crate::prompt::{Prompt, SamplingParams};

/// Per-poll bound on `/health`, independent of the completion timeout.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    stop: &'a [String],
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Client for a llama.cpp `llama-server` instance.
#[derive(Clone)]
pub struct LlamaServerClient {
    client: Client,
    base_url: String,
}

impl LlamaServerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AppError::StartupError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(LlamaServerClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True once the runtime has finished loading its model.
    pub async fn is_healthy(&self) -> bool {
        let request = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_CHECK_TIMEOUT);
        match request.send().await {
            Ok(res) => res.status() == StatusCode::OK,
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl CompletionProvider for LlamaServerClient {
    async fn complete(&self, prompt: &Prompt, params: &SamplingParams) -> Result<String> {
        let body = CompletionRequest {
            prompt: &prompt.text,
            n_predict: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            stop: &prompt.stop,
            stream: false,
        };

        let res = self
            .client
            .post(format!("{}/completion", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(AppError::InferenceError(format!(
                "runtime returned {}: {}",
                status, detail
            )));
        }

        let reply: CompletionResponse = res
            .json()
            .await
            .map_err(|e| AppError::InferenceError(format!("Invalid response format from runtime: {}", e)))?;

        Ok(reply.content)
    }
}
