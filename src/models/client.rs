//! Client history derived from real reservations

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Aggregated contact history for one client (keyed by email)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClientRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Confirmed appointments dated today or earlier
    pub visit_count: u32,
    pub last_visit: Option<NaiveDate>,
    pub next_appointment: Option<NaiveDate>,
    /// Notes left with reservations, oldest first
    pub notes: Vec<String>,
}
