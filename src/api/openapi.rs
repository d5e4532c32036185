//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, auth, availability, clients, health, settings};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hypnos API",
        version = "0.3.0",
        description = "Appointment booking for a hypnotherapy practice",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Settings
        settings::get_settings,
        settings::init_settings,
        settings::update_settings,
        // Availability
        availability::get_day,
        availability::get_range,
        availability::get_admin_day,
        // Appointments
        appointments::book_appointment,
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::confirm_appointment,
        appointments::cancel_appointment,
        appointments::seed_fictitious,
        appointments::purge_fictitious,
        // Clients
        clients::list_clients,
    ),
    components(
        schemas(
            // Auth
            crate::models::admin::LoginRequest,
            crate::models::admin::LoginResponse,
            crate::models::admin::SessionInfo,
            // Settings
            crate::models::settings::AppointmentSettings,
            crate::models::settings::UpdateSettings,
            // Availability
            crate::models::appointment::Slot,
            crate::models::appointment::SlotStatus,
            crate::models::appointment::DayAvailability,
            crate::models::appointment::DateRangeQuery,
            // Appointments
            crate::models::appointment::BookingRequest,
            crate::models::appointment::SeedFictitiousRequest,
            crate::models::appointment::RealReservation,
            crate::models::appointment::ReservationStatus,
            crate::models::appointment::Contact,
            appointments::SeedResponse,
            appointments::PurgeResponse,
            // Clients
            crate::models::client::ClientRecord,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Admin session"),
        (name = "settings", description = "Appointment settings"),
        (name = "availability", description = "Slot availability"),
        (name = "appointments", description = "Booking and reservation management"),
        (name = "clients", description = "Client history")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
