//! Admin session endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::admin::{LoginRequest, LoginResponse, SessionInfo},
    AppState,
};

use super::AdminSession;

/// Log in as the practice administrator
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(response))
}

/// Describe the current admin session
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session details", body = SessionInfo),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(AdminSession(claims): AdminSession) -> Json<SessionInfo> {
    Json(SessionInfo {
        username: claims.sub,
        role: claims.role,
        expires_at: claims.exp,
    })
}
