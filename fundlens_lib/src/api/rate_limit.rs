use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::rate_limiter::{retry_after_secs, RateLimiters, Tier};

use super::ApiError;

#[derive(Clone)]
pub(super) struct TierGuard {
    pub(super) limiters: Arc<RateLimiters>,
    pub(super) tier: Tier,
}

/// The remote IP, or `unknown` when the server was not started with
/// connection info (as in router tests).
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub(super) async fn enforce(
    State(guard): State<TierGuard>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    match guard.limiters.check(guard.tier, &key) {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            let limit = guard.limiters.limiter(guard.tier).limit();
            debug!(client = %key, tier = ?guard.tier, %limit, "rate limited");
            ApiError::RateLimited {
                limit: limit.to_string(),
                retry_after: retry_after_secs(wait),
            }
            .into_response()
        }
    }
}
