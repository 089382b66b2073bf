use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use marquee_domain::Claims;

use crate::error::ApiResult;
use crate::state::AppState;

/// Runs the permission gate for a request that requires `required`.
pub async fn authorize(
    state: &AppState,
    required: &str,
    headers: &HeaderMap,
) -> ApiResult<Claims> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.access_service.authorize(required, authorization).await?;
    Ok(claims)
}
