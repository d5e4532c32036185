//! Appointment endpoints (public booking, admin lifecycle, decorative occupancy)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        appointment::{parse_date, BookingRequest, DateRangeQuery, SeedFictitiousRequest},
        RealReservation,
    },
    AppState,
};

use super::AdminSession;

/// Result of a fictitious seeding run
#[derive(Serialize, ToSchema)]
pub struct SeedResponse {
    pub inserted: u64,
}

/// Result of a fictitious purge
#[derive(Serialize, ToSchema)]
pub struct PurgeResponse {
    pub removed: u64,
}

/// Request an appointment
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Pending reservation created", body = RealReservation),
        (status = 400, description = "Invalid contact or slot", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot no longer available", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<RealReservation>)> {
    let created = state.services.appointments.book(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List real reservations (defaults to today and the next 30 days)
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Reservations", body = Vec<RealReservation>)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<RealReservation>>> {
    let start = match query.start_date.as_deref() {
        Some(s) => parse_date(s, "start_date")?,
        None => state.services.appointments.today(),
    };
    let end = match query.end_date.as_deref() {
        Some(s) => parse_date(s, "end_date")?,
        None => start + Duration::days(30),
    };
    let list = state.services.appointments.list(start, end).await?;
    Ok(Json(list))
}

/// Get a reservation
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = RealReservation),
        (status = 404, description = "Unknown reservation", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RealReservation>> {
    let reservation = state.services.appointments.get(id).await?;
    Ok(Json(reservation))
}

/// Confirm a pending reservation
#[utoipa::path(
    post,
    path = "/appointments/{id}/confirm",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation booked", body = RealReservation),
        (status = 404, description = "Unknown reservation", body = crate::error::ErrorResponse),
        (status = 409, description = "Not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_appointment(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RealReservation>> {
    let reservation = state.services.appointments.confirm(id).await?;
    Ok(Json(reservation))
}

/// Cancel a reservation, freeing its slot
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation cancelled"),
        (status = 404, description = "Unknown reservation", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.appointments.cancel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Seed fictitious occupancy for one day or a range
#[utoipa::path(
    post,
    path = "/appointments/fictitious/seed",
    tag = "appointments",
    security(("bearer_auth" = [])),
    request_body = SeedFictitiousRequest,
    responses(
        (status = 200, description = "Records inserted", body = SeedResponse)
    )
)]
pub async fn seed_fictitious(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
    Json(request): Json<SeedFictitiousRequest>,
) -> AppResult<Json<SeedResponse>> {
    let start = parse_date(&request.start_date, "start_date")?;
    let appointments = &state.services.appointments;
    let inserted = match request.end_date.as_deref() {
        Some(end) => {
            let end = parse_date(end, "end_date")?;
            appointments.seed_fictitious_range(start, end).await?
        }
        None => appointments.seed_fictitious(start).await?,
    };
    Ok(Json(SeedResponse { inserted }))
}

/// Remove all fictitious occupancy
#[utoipa::path(
    delete,
    path = "/appointments/fictitious",
    tag = "appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Records removed", body = PurgeResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn purge_fictitious(
    State(state): State<AppState>,
    AdminSession(_claims): AdminSession,
) -> AppResult<Json<PurgeResponse>> {
    let removed = state.services.appointments.purge_fictitious().await?;
    Ok(Json(PurgeResponse { removed }))
}
