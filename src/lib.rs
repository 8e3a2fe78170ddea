pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod prompt;
pub mod summarizer;
pub mod text;

use std::sync::Arc;

use api::guard::Guard;
use config::Config;
use llm::CompletionProvider;
use prompt::SamplingParams;
use summarizer::Summarizer;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<Summarizer>,
    pub guard: Arc<Guard>,
}

impl AppState {
    pub fn new(summarizer: Summarizer, guard: Guard) -> Self {
        AppState {
            summarizer: Arc::new(summarizer),
            guard: Arc::new(guard),
        }
    }

    /// Wires `provider` into a state configured from `config`.
    pub fn from_config(config: &Config, provider: Arc<dyn CompletionProvider>) -> Self {
        let summarizer = Summarizer::new(provider, SamplingParams::with_max_tokens(config.max_tokens));
        let guard = Guard {
            allowed: config.allowed_addrs.clone(),
            rate_limit_per_minute: config.rate_limit_per_minute,
        };
        AppState::new(summarizer, guard)
    }
}
