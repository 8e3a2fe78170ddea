use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::models::ScrapeRequest;
use crate::error::Result;
use crate::llm::CompletionProvider;
use crate::prompt::{build_prompt, SamplingParams};
use crate::text::{clean_text, count_bullets, extract_bullets};

/// Output of the pipeline for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    /// Bullet lines found in the completion; zero means the raw completion
    /// was returned instead.
    pub bullet_count: usize,
}

/// Runs clean, prompt, infer and extract for a request.
///
/// All calls share one provider. The model behind it is not reentrant, so
/// completions are serialized through `inference_lock`.
pub struct Summarizer {
    provider: Arc<dyn CompletionProvider>,
    params: SamplingParams,
    inference_lock: Mutex<()>,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn CompletionProvider>, params: SamplingParams) -> Self {
        Summarizer {
            provider,
            params,
            inference_lock: Mutex::new(()),
        }
    }

    pub async fn summarize(&self, req: &ScrapeRequest) -> Result<Summary> {
        let cleaned = clean_text(&req.text);
        info!(
            "Cleaned text: {} chars in, {} chars out",
            req.length(),
            cleaned.chars().count()
        );

        let prompt = build_prompt(&cleaned);

        let raw_output = {
            let _guard = self.inference_lock.lock().await;
            let started = Instant::now();
            let result = self.provider.complete(&prompt, &self.params).await;
            info!("Completion finished in {:?}", started.elapsed());
            result?
        };

        let bullet_count = count_bullets(&raw_output);
        if bullet_count == 0 {
            warn!("Model output had no bullet lines, returning raw output");
        }

        Ok(Summary {
            text: extract_bullets(&raw_output),
            bullet_count,
        })
    }
}
