//! API handlers for Hypnos REST endpoints

pub mod appointments;
pub mod auth;
pub mod availability;
pub mod clients;
pub mod health;
pub mod openapi;
pub mod settings;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{delete, get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::AdminClaims, AppState};

/// Extractor for an authenticated admin session (JWT bearer token)
pub struct AdminSession(pub AdminClaims);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| AppError::Authentication(e.to_string()))?;

        let claims = state.services.auth.verify_token(bearer.token())?;
        Ok(AdminSession(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Admin session
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Settings
        .route("/settings", get(settings::get_settings).put(settings::update_settings))
        .route("/settings/init", post(settings::init_settings))
        // Availability
        .route("/availability", get(availability::get_range))
        .route("/availability/:date", get(availability::get_day))
        .route("/admin/availability/:date", get(availability::get_admin_day))
        // Appointments
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::book_appointment),
        )
        .route("/appointments/fictitious", delete(appointments::purge_fictitious))
        .route("/appointments/fictitious/seed", post(appointments::seed_fictitious))
        .route(
            "/appointments/:id",
            get(appointments::get_appointment).delete(appointments::cancel_appointment),
        )
        .route("/appointments/:id/confirm", post(appointments::confirm_appointment))
        // Clients
        .route("/clients", get(clients::list_clients))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
