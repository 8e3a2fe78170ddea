use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::PeerIpKeyExtractor,
    GovernorLayer,
};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::AppState;

/// Access rules applied before `/scrape` runs.
#[derive(Default)]
pub struct Guard {
    /// Remote addresses allowed to call the service; `None` allows all.
    pub allowed: Option<Vec<IpAddr>>,
    /// Requests per client per minute; `None` disables limiting.
    pub rate_limit_per_minute: Option<u32>,
}

impl Guard {
    pub fn is_allowed(&self, client: Option<IpAddr>) -> bool {
        match (&self.allowed, client) {
            (None, _) => true,
            (Some(allowed), Some(ip)) => allowed.contains(&ip.to_canonical()),
            (Some(_), None) => false,
        }
    }
}

fn client_ip(req: &Request) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_canonical())
}

pub async fn allow_list(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let client = client_ip(&req);
    if !state.guard.is_allowed(client) {
        warn!("Rejected request from {:?}", client);
        return AppError::Forbidden.into_response();
    }
    next.run(req).await
}

/// Wraps `router` in a per-peer-IP limiter allowing `per_minute` requests
/// per minute, refilled evenly across the minute.
pub fn rate_limited<S>(router: Router<S>, per_minute: u32) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let invalid = || AppError::StartupError(format!("Invalid rate limit: {} per minute", per_minute));
    if per_minute == 0 {
        return Err(invalid());
    }

    let config = GovernorConfigBuilder::default()
        .key_extractor(PeerIpKeyExtractor)
        .period(Duration::from_secs(60) / per_minute)
        .burst_size(per_minute)
        .finish()
        .ok_or_else(invalid)?;

    Ok(router.layer(GovernorLayer { config: Arc::new(config) }))
}
