use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};

use crate::database::models::{User, UserProfile};
use crate::error::{ApiError, DatabaseResultExt};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// POST /api/auth/register - create or refresh the caller's user record
/// from the verified token
pub async fn register(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<RegisterResponse> {
    let profile = UserProfile {
        uid: user.uid,
        email: user.email,
        display_name: user.display_name,
        email_verified: user.email_verified,
    };

    let saved = state.users.upsert(profile).await.or_internal("Failed to register user")?;
    tracing::info!(uid = %saved.uid, "Registered user");

    Ok(ApiResponse::ok(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: saved,
    }))
}

/// GET /api/auth/me - the caller's stored user record
pub async fn me(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    let found = state
        .users
        .find_by_uid(&user.uid)
        .await
        .or_internal("Failed to get user info")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::ok(found))
}
