//! Client history endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::ClientRecord, AppState};

use super::AdminSession;

/// List clients derived from real reservations
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Client records", body = Vec<ClientRecord>)
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
) -> AppResult<Json<Vec<ClientRecord>>> {
    let clients = state.services.clients.list().await?;
    Ok(Json(clients))
}
