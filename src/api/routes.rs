use axum::{
    routing::post,
    Router,
    extract::{DefaultBodyLimit, Json, State, rejection::JsonRejection},
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tower_http::cors::{CorsLayer, Any};
use tracing::{info, warn, error};

use crate::error::{Result, AppError};
use crate::api::guard;
use crate::api::models::{ScrapeRequest, SummaryMeta};
use crate::api::response;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Result<Router> {
    let mut router = Router::new().route("/scrape", post(scrape_handler));
    if let Some(per_minute) = app_state.guard.rate_limit_per_minute {
        router = guard::rate_limited(router, per_minute)?;
    }

    // `text` has no size bound; the cleaner truncates it anyway.
    Ok(router
        .layer(middleware::from_fn_with_state(app_state.clone(), guard::allow_list))
        .layer(DefaultBodyLimit::disable())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state))
}

async fn scrape_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let start_time = std::time::Instant::now();

    let result = match body {
        Ok(Json(value)) => process_scrape_request(&state, &value).await,
        Err(rejection) => Err(rejection_error(rejection)),
    };

    info!("Request processing took: {:?}", start_time.elapsed());

    match result {
        Ok(response) => response,
        Err(err) => {
            match &err {
                AppError::ValidationError(msg) => warn!("Validation error: {}", msg),
                AppError::InferenceError(msg) => error!("Inference error: {}", msg),
                other => error!("Request failed: {}", other),
            }
            err.into_response()
        }
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    let reason = match &rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON content type",
        JsonRejection::BytesRejection(_) => "Failed to read request body",
        _ => "Invalid JSON body",
    };
    AppError::ValidationError(format!("{}: {}", reason, rejection.body_text()))
}

async fn process_scrape_request(state: &AppState, body: &Value) -> Result<Response> {
    let req = ScrapeRequest::from_json(body)?;
    info!(
        "Summarizing '{}' ({}), {} chars",
        req.title,
        req.url,
        req.length()
    );

    let summary = state.summarizer.summarize(&req).await?;
    info!("Summary ready with {} bullet points", summary.bullet_count);

    Ok(response::success(summary.text, SummaryMeta::from(&req)).into_response())
}
