use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            uid: identity.uid,
            email: identity.email,
            email_verified: identity.email_verified,
            display_name: identity.display_name,
        }
    }
}

/// Auth gate: verifies the bearer token with the configured identity provider
/// and injects the caller as [`AuthUser`]
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provider = state
        .identity
        .clone()
        .ok_or_else(|| ApiError::service_unavailable("Authentication is not configured"))?;

    let token = extract_bearer(request.headers()).ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let identity = provider.verify(&token).await?;
    tracing::debug!(uid = %identity.uid, "Authenticated {} {}", request.method(), request.uri().path());

    request.extensions_mut().insert(AuthUser::from(identity));
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
