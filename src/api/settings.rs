//! Settings endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{settings::UpdateSettings, AppointmentSettings},
    AppState,
};

use super::AdminSession;

/// Get current appointment settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Current settings", body = AppointmentSettings),
        (status = 404, description = "Settings not initialized", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<AppointmentSettings>> {
    let settings = state.services.settings.get().await?;
    Ok(Json(settings))
}

/// Initialize settings from configured defaults (no-op when they exist)
#[utoipa::path(
    post,
    path = "/settings/init",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Settings created", body = AppointmentSettings),
        (status = 200, description = "Settings already existed", body = AppointmentSettings),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn init_settings(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
) -> AppResult<(StatusCode, Json<AppointmentSettings>)> {
    let (settings, created) = state.services.settings.initialize().await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(settings)))
}

/// Update settings
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = AppointmentSettings),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 422, description = "Settings violate an invariant", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
    Json(request): Json<UpdateSettings>,
) -> AppResult<Json<AppointmentSettings>> {
    let settings = state.services.settings.update(&request).await?;
    Ok(Json(settings))
}
