//! Appointment settings (singleton document)

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    config::AppointmentDefaults,
    error::{AppError, AppResult},
};

/// Furthest booking horizon an admin may configure (about ten years)
pub const MAX_ADVANCE_BOOKING_DAYS: i32 = 3650;

/// Booking configuration shared by the public calendar and the admin panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AppointmentSettings {
    /// First slot start (HH:MM:SS)
    #[schema(value_type = String, example = "09:00:00")]
    pub working_hours_start: NaiveTime,
    /// Slots must end at or before this time
    #[schema(value_type = String, example = "18:00:00")]
    pub working_hours_end: NaiveTime,
    /// Open weekdays (0=Sunday, 6=Saturday)
    pub working_days: Vec<i16>,
    /// Slot length in minutes
    pub slot_duration: i32,
    /// Gap between consecutive slots in minutes
    pub break_duration: i32,
    /// How many days ahead a slot may be booked
    pub max_advance_booking: i32,
    /// Share of available slots shown as occupied (0-100)
    pub fictional_booking_percentage: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Update settings request (admin)
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSettings {
    /// HH:MM
    pub working_hours_start: Option<String>,
    /// HH:MM
    pub working_hours_end: Option<String>,
    pub working_days: Option<Vec<i16>>,
    pub slot_duration: Option<i32>,
    pub break_duration: Option<i32>,
    pub max_advance_booking: Option<i32>,
    pub fictional_booking_percentage: Option<i16>,
}

/// Parse a wall-clock time given as HH:MM (HH:MM:SS is accepted too)
pub fn parse_wall_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}

impl AppointmentSettings {
    /// Build the initial document from configured defaults
    pub fn from_defaults(defaults: &AppointmentDefaults) -> AppResult<Self> {
        let invalid = |e: AppError| AppError::InvalidConfiguration(e.to_string());
        let now = Utc::now();
        let settings = Self {
            working_hours_start: parse_wall_time(
                &defaults.working_hours_start,
                "working_hours_start",
            )
            .map_err(invalid)?,
            working_hours_end: parse_wall_time(&defaults.working_hours_end, "working_hours_end")
                .map_err(invalid)?,
            working_days: defaults.working_days.clone(),
            slot_duration: defaults.slot_duration,
            break_duration: defaults.break_duration,
            max_advance_booking: defaults.max_advance_booking,
            fictional_booking_percentage: defaults.fictional_booking_percentage,
            created_at: now,
            updated_at: now,
        };
        settings.normalized()
    }

    /// Apply a partial update, returning the validated result
    pub fn apply(&self, patch: &UpdateSettings) -> AppResult<Self> {
        let mut next = self.clone();
        if let Some(ref start) = patch.working_hours_start {
            next.working_hours_start = parse_wall_time(start, "working_hours_start")?;
        }
        if let Some(ref end) = patch.working_hours_end {
            next.working_hours_end = parse_wall_time(end, "working_hours_end")?;
        }
        if let Some(ref days) = patch.working_days {
            next.working_days = days.clone();
        }
        if let Some(v) = patch.slot_duration {
            next.slot_duration = v;
        }
        if let Some(v) = patch.break_duration {
            next.break_duration = v;
        }
        if let Some(v) = patch.max_advance_booking {
            next.max_advance_booking = v;
        }
        if let Some(v) = patch.fictional_booking_percentage {
            next.fictional_booking_percentage = v;
        }
        next.updated_at = Utc::now();
        next.normalized()
    }

    /// Sort and deduplicate working days, then check every invariant
    pub fn normalized(mut self) -> AppResult<Self> {
        self.working_days.sort_unstable();
        self.working_days.dedup();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.working_hours_start >= self.working_hours_end {
            return Err(AppError::InvalidConfiguration(
                "working_hours_start must be before working_hours_end".to_string(),
            ));
        }
        if self.slot_duration <= 0 {
            return Err(AppError::InvalidConfiguration(
                "slot_duration must be positive".to_string(),
            ));
        }
        if self.break_duration < 0 {
            return Err(AppError::InvalidConfiguration(
                "break_duration cannot be negative".to_string(),
            ));
        }
        if !(0..=MAX_ADVANCE_BOOKING_DAYS).contains(&self.max_advance_booking) {
            return Err(AppError::InvalidConfiguration(format!(
                "max_advance_booking must be between 0 and {}",
                MAX_ADVANCE_BOOKING_DAYS
            )));
        }
        if !(0..=100).contains(&self.fictional_booking_percentage) {
            return Err(AppError::InvalidConfiguration(
                "fictional_booking_percentage must be between 0 and 100".to_string(),
            ));
        }
        if let Some(day) = self.working_days.iter().find(|d| !(0..=6).contains(*d)) {
            return Err(AppError::InvalidConfiguration(format!(
                "working day {} is out of range (0=Sunday ... 6=Saturday)",
                day
            )));
        }
        Ok(())
    }

    /// Minutes between two consecutive slot starts
    pub fn step_minutes(&self) -> i64 {
        i64::from(self.slot_duration) + i64::from(self.break_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AppointmentSettings {
        AppointmentSettings::from_defaults(&AppointmentDefaults::default()).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let s = defaults();
        assert_eq!(s.working_days, vec![1, 2, 3, 4, 5]);
        assert_eq!(s.step_minutes(), 75);
    }

    #[test]
    fn test_apply_rejects_inverted_hours() {
        let patch = UpdateSettings {
            working_hours_start: Some("18:00".to_string()),
            working_hours_end: Some("09:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(defaults().apply(&patch), Err(AppError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_apply_rejects_bad_percentage_and_days() {
        let patch = UpdateSettings {
            fictional_booking_percentage: Some(101),
            ..Default::default()
        };
        assert!(matches!(defaults().apply(&patch), Err(AppError::InvalidConfiguration(_))));

        let patch = UpdateSettings {
            working_days: Some(vec![1, 7]),
            ..Default::default()
        };
        assert!(matches!(defaults().apply(&patch), Err(AppError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_apply_normalizes_days() {
        let patch = UpdateSettings {
            working_days: Some(vec![5, 1, 1, 3]),
            ..Default::default()
        };
        assert_eq!(defaults().apply(&patch).unwrap().working_days, vec![1, 3, 5]);
    }

    #[test]
    fn test_bad_time_format_is_a_validation_error() {
        let patch = UpdateSettings {
            working_hours_start: Some("9h".to_string()),
            ..Default::default()
        };
        assert!(matches!(defaults().apply(&patch), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_apply_bounds_advance_booking() {
        let patch = UpdateSettings {
            max_advance_booking: Some(200_000_000),
            ..Default::default()
        };
        assert!(matches!(defaults().apply(&patch), Err(AppError::InvalidConfiguration(_))));

        let patch = UpdateSettings {
            max_advance_booking: Some(MAX_ADVANCE_BOOKING_DAYS),
            ..Default::default()
        };
        assert_eq!(
            defaults().apply(&patch).unwrap().max_advance_booking,
            MAX_ADVANCE_BOOKING_DAYS
        );
    }
}
