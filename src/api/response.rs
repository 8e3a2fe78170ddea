use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;

/// Uniform envelope returned by every `/scrape` outcome.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<T>,
}

#[derive(Serialize)]
pub struct ForbiddenBody {
    pub error: &'static str,
}

pub fn success<T: Serialize>(summary: String, meta: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            summary: Some(summary),
            error: None,
            meta: Some(meta),
        }),
    )
}

pub fn failure(status: StatusCode, message: String) -> (StatusCode, Json<Envelope<()>>) {
    (
        status,
        Json(Envelope {
            success: false,
            summary: None,
            error: Some(message),
            meta: None,
        }),
    )
}

/// Inference failures keep an empty `summary` so clients that read it
/// unconditionally still get a string.
pub fn inference_failure(message: String) -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope {
            success: false,
            summary: Some(String::new()),
            error: Some(message),
            meta: None,
        }),
    )
}

pub fn forbidden() -> (StatusCode, Json<ForbiddenBody>) {
    (StatusCode::FORBIDDEN, Json(ForbiddenBody { error: "Forbidden" }))
}
