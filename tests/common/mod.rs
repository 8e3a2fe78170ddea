#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use scrape_summarizer::error::{AppError, Result};
use scrape_summarizer::llm::CompletionProvider;
use scrape_summarizer::prompt::{Prompt, SamplingParams};
use tokio::net::TcpListener;

/// Provider double that returns a fixed reply (or failure) and counts calls.
pub struct StubProvider {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(StubProvider {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(cause: &str) -> Arc<Self> {
        Arc::new(StubProvider {
            reply: Err(cause.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, _prompt: &Prompt, _params: &SamplingParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(AppError::InferenceError)
    }
}

/// Serves `app` on an ephemeral loopback port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}
