use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::net::SocketAddr;
use util::{rate_limit::RateDecision, state::AppState};

use crate::auth::identity::AuthNode;
use crate::response::{ApiResponse, Empty};

/// Retry hint carried in the body of a 429 response.
#[derive(Serialize, Default)]
pub struct RetryHint {
    pub retry_after_seconds: u64,
}

/// Middleware enforcing the per-client call budget on ingestion routes.
///
/// The key is the first `X-Forwarded-For` entry when present (the server is
/// expected to sit behind a reverse proxy), otherwise the peer address.
/// Rejections carry a `Retry-After` header and the same hint in the body.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&req);

    match state.limiter().check(&key) {
        RateDecision::Allowed { .. } => next.run(req).await,
        RateDecision::Limited {
            retry_after_seconds,
        } => {
            tracing::warn!(client = %key, retry_after_seconds, "Rate limit exceeded");
            let body = ApiResponse {
                success: false,
                data: RetryHint {
                    retry_after_seconds,
                },
                message: "Rate limit exceeded".to_string(),
            };
            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

/// Derives the rate-limit key for a request.
fn client_key(req: &Request<Body>) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_owned();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Ensures an authenticated node is operating on its own resources.
///
/// A node may not read or confirm another node's config queue.
pub fn ensure_node_scope(
    auth: &AuthNode,
    node_id: i64,
) -> Result<(), (StatusCode, Json<ApiResponse<Empty>>)> {
    if auth.0.id == node_id {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Forbidden")),
        ))
    }
}
