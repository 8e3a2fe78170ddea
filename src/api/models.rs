use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};

/// A validated `/scrape` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRequest {
    pub text: String,
    pub title: String,
    pub url: String,
}

impl ScrapeRequest {
    /// Validates a decoded JSON body. Only `text` is mandatory; `title` and
    /// `url` fall back to empty strings when absent or not strings.
    ///
    /// Whitespace-only `text` is rejected on purpose: it cleans to an empty
    /// article, and prompting the model with nothing only yields noise.
    pub fn from_json(body: &Value) -> Result<Self> {
        let fields = body
            .as_object()
            .ok_or_else(|| AppError::ValidationError("Request body must be a JSON object".to_string()))?;

        let text = match fields.get("text") {
            Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
            Some(Value::String(_)) => {
                return Err(AppError::ValidationError("Field 'text' must not be empty".to_string()));
            }
            Some(_) => {
                return Err(AppError::ValidationError("Field 'text' must be a string".to_string()));
            }
            None => return Err(AppError::ValidationError("Missing text".to_string())),
        };

        Ok(ScrapeRequest {
            text,
            title: optional_string(fields.get("title")),
            url: optional_string(fields.get("url")),
        })
    }

    /// Character count of the text as received, before cleaning.
    pub fn length(&self) -> usize {
        self.text.chars().count()
    }
}

fn optional_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SummaryMeta {
    pub title: String,
    pub url: String,
    pub length: usize,
}

impl From<&ScrapeRequest> for SummaryMeta {
    fn from(req: &ScrapeRequest) -> Self {
        SummaryMeta {
            title: req.title.clone(),
            url: req.url.clone(),
            length: req.length(),
        }
    }
}
