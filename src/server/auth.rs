use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::errors::ApiError;
use super::AppState;
use crate::transport::http::API_KEY_HEADER;

/// Caller identity resolved from the API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub String);

/// Reject requests whose `X-API-Key` is missing or unknown.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(key) = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return Err(ApiError::Unauthorized("API key is required"));
    };

    let Some(identity) = state.api_keys.get(key).cloned() else {
        return Err(ApiError::Unauthorized("Invalid API key"));
    };

    request.extensions_mut().insert(Identity(identity));
    Ok(next.run(request).await)
}
