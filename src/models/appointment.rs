//! Reservation records and slot views

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Placeholder contact stored on fictitious rows
pub const FICTITIOUS_NAME: &str = "Reserved";
pub const FICTITIOUS_EMAIL: &str = "reserved@hypnos.invalid";
pub const FICTITIOUS_PHONE: &str = "0000000000";

// ---------------------------------------------------------------------------
// Reservation (domain)
// ---------------------------------------------------------------------------

/// Lifecycle status of a real reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Booked,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Booked => "booked",
        }
    }
}

/// Client contact details attached to a real reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A reservation made by (or for) an actual client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RealReservation {
    pub id: Uuid,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub time: NaiveTime,
    #[serde(flatten)]
    pub contact: Contact,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A decorative reservation that only makes the calendar look occupied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FictitiousReservation {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

/// Any stored reservation. Occupancy checks only ever look at `Real`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reservation {
    Real(RealReservation),
    Fictitious(FictitiousReservation),
}

impl Reservation {
    pub fn id(&self) -> Uuid {
        match self {
            Reservation::Real(r) => r.id,
            Reservation::Fictitious(f) => f.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Reservation::Real(r) => r.date,
            Reservation::Fictitious(f) => f.date,
        }
    }

    pub fn time(&self) -> NaiveTime {
        match self {
            Reservation::Real(r) => r.time,
            Reservation::Fictitious(f) => f.time,
        }
    }

    pub fn as_real(&self) -> Option<&RealReservation> {
        match self {
            Reservation::Real(r) => Some(r),
            Reservation::Fictitious(_) => None,
        }
    }

    pub fn into_real(self) -> Option<RealReservation> {
        match self {
            Reservation::Real(r) => Some(r),
            Reservation::Fictitious(_) => None,
        }
    }

    pub fn is_fictitious(&self) -> bool {
        matches!(self, Reservation::Fictitious(_))
    }
}

/// Data for a new real reservation, already validated and parsed
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub contact: Contact,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// AppointmentRow (storage)
// ---------------------------------------------------------------------------

/// Row of the `appointments` table
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentRow {
    pub id: Uuid,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    /// "real" or "fictitious"
    pub kind: String,
    /// "pending", "booked" or "fictitious"
    pub status: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Reservation {
    type Error = AppError;

    fn try_from(row: AppointmentRow) -> AppResult<Self> {
        match (row.kind.as_str(), row.status.as_str()) {
            ("fictitious", _) => Ok(Reservation::Fictitious(FictitiousReservation {
                id: row.id,
                date: row.slot_date,
                time: row.slot_time,
                created_at: row.created_at,
            })),
            ("real", status) => {
                let status = match status {
                    "pending" => ReservationStatus::Pending,
                    "booked" => ReservationStatus::Booked,
                    other => {
                        return Err(AppError::Internal(format!(
                            "Appointment {} has unknown status '{}'",
                            row.id, other
                        )))
                    }
                };
                Ok(Reservation::Real(RealReservation {
                    id: row.id,
                    date: row.slot_date,
                    time: row.slot_time,
                    contact: Contact {
                        name: row.name,
                        email: row.email,
                        phone: row.phone,
                    },
                    notes: row.notes,
                    status,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                }))
            }
            (other, _) => Err(AppError::Internal(format!(
                "Appointment {} has unknown kind '{}'",
                row.id, other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Slot views
// ---------------------------------------------------------------------------

/// Status of a generated slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Pending,
    Fictitious,
}

impl From<ReservationStatus> for SlotStatus {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => SlotStatus::Pending,
            ReservationStatus::Booked => SlotStatus::Booked,
        }
    }
}

/// One bookable interval on a given date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Slot {
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    pub status: SlotStatus,
    /// Reservation holding the slot (admin view only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<Uuid>,
}

impl Slot {
    /// What an outside visitor sees: decorative occupancy looks like a real booking
    pub fn public_view(mut self) -> Self {
        if self.status == SlotStatus::Fictitious {
            self.status = SlotStatus::Booked;
        }
        self.reservation_id = None;
        self
    }
}

/// Slots for one day
#[derive(Debug, Serialize, ToSchema)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Public booking request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookingRequest {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Slot start time (HH:MM)
    pub time: String,
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Phone must be 6 to 20 characters"))]
    pub phone: String,
    #[validate(length(max = 2000, message = "Notes are limited to 2000 characters"))]
    pub notes: Option<String>,
}

/// Date range query (YYYY-MM-DD)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DateRangeQuery {
    /// First day (inclusive)
    pub start_date: Option<String>,
    /// Last day (inclusive)
    pub end_date: Option<String>,
}

/// Fictitious seeding request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SeedFictitiousRequest {
    /// First day to seed (YYYY-MM-DD)
    pub start_date: String,
    /// Last day to seed, defaults to start_date
    pub end_date: Option<String>,
}

/// Parse a calendar date given as YYYY-MM-DD
pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, status: &str) -> AppointmentRow {
        AppointmentRow {
            id: Uuid::new_v4(),
            slot_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            slot_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            kind: kind.to_string(),
            status: status.to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "0600000000".to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let real = Reservation::try_from(row("real", "booked")).unwrap();
        assert_eq!(real.as_real().map(|r| r.status), Some(ReservationStatus::Booked));

        let fake = Reservation::try_from(row("fictitious", "fictitious")).unwrap();
        assert!(fake.is_fictitious());
        assert!(fake.as_real().is_none());

        assert!(Reservation::try_from(row("real", "fictitious")).is_err());
        assert!(Reservation::try_from(row("ghost", "pending")).is_err());
    }

    #[test]
    fn test_public_view_hides_fictitious() {
        let slot = Slot {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            status: SlotStatus::Fictitious,
            reservation_id: Some(Uuid::new_v4()),
        };
        let public = slot.public_view();
        assert_eq!(public.status, SlotStatus::Booked);
        assert_eq!(public.reservation_id, None);
    }
}
