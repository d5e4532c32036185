//! Availability endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Duration;

use crate::{
    error::AppResult,
    models::{
        appointment::{parse_date, DateRangeQuery, DayAvailability},
        Slot,
    },
    AppState,
};

use super::AdminSession;

/// Slots of one day, as shown to visitors
#[utoipa::path(
    get,
    path = "/availability/{date}",
    tag = "availability",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Ordered slots", body = Vec<Slot>),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = parse_date(&date, "date")?;
    let slots = state.services.appointments.availability(date).await?;
    Ok(Json(slots))
}

/// Slots for a date range (defaults to the coming week)
#[utoipa::path(
    get,
    path = "/availability",
    tag = "availability",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Slots per day", body = Vec<DayAvailability>),
        (status = 400, description = "Invalid range", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_range(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<DayAvailability>>> {
    let start = match query.start_date.as_deref() {
        Some(s) => parse_date(s, "start_date")?,
        None => state.services.appointments.today(),
    };
    let end = match query.end_date.as_deref() {
        Some(s) => parse_date(s, "end_date")?,
        None => start + Duration::days(6),
    };
    let days = state.services.appointments.availability_range(start, end).await?;
    Ok(Json(days))
}

/// Slots of one day including decorative occupancy and reservation ids
#[utoipa::path(
    get,
    path = "/admin/availability/{date}",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Ordered slots", body = Vec<Slot>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_admin_day(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
    Path(date): Path<String>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = parse_date(&date, "date")?;
    let slots = state.services.appointments.admin_availability(date).await?;
    Ok(Json(slots))
}
