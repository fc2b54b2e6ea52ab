use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use util::state::AppState;

use crate::auth::identity::{AuthNode, NodeCredentials};
use crate::response::{ApiResponse, Empty};

/// Implements extraction of `AuthNode` from request headers.
///
/// The `Authorization: Bearer {nodeId}:{secret}` token is parsed and the
/// secret verified against the node's stored argon2 hash. Only active nodes
/// can authenticate.
///
/// # Errors
/// Returns `401 Unauthorized` with a single generic message for every failure
/// mode: missing/malformed header, unknown node, inactive node, or secret
/// mismatch. The caller cannot tell these apart.
impl<S> FromRequestParts<S> for AuthNode
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiResponse<Empty>>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| reject())?;

        let credentials = NodeCredentials::parse(bearer.token()).ok_or_else(reject)?;

        let app_state = AppState::from_ref(state);
        let node = db::models::node::Model::find_by_id(app_state.db(), credentials.node_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "DB error during credential verification");
                reject()
            })?
            .ok_or_else(reject)?;

        if !node.is_active || !node.verify_api_key(&credentials.api_key) {
            return Err(reject());
        }

        Ok(AuthNode(node))
    }
}

fn reject() -> (StatusCode, Json<ApiResponse<Empty>>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Authentication failed")),
    )
}
