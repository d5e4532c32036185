//! Slot generation for a single day
//!
//! Pure functions over settings and reservations. Nothing here touches storage,
//! so the same rules serve the public calendar, the admin view and the booking
//! eligibility check.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

use crate::models::{AppointmentSettings, Reservation, Slot, SlotStatus};

/// Weekday number used by `working_days` (0=Sunday, 6=Saturday)
pub fn weekday_number(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// True when `date` lies in `[today, today + max_advance_booking]`
pub fn within_horizon(date: NaiveDate, settings: &AppointmentSettings, today: NaiveDate) -> bool {
    date >= today && date <= horizon_end(settings, today)
}

/// Last day that may currently be booked, saturating at `NaiveDate::MAX`
pub fn horizon_end(settings: &AppointmentSettings, today: NaiveDate) -> NaiveDate {
    let days = i64::from(settings.max_advance_booking.max(0));
    today
        .checked_add_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MAX)
}

fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

fn time_of(minutes: i64) -> Option<NaiveTime> {
    let secs = u32::try_from(minutes * 60).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

/// Slot start times for an open day, ignoring occupancy
pub fn slot_times(settings: &AppointmentSettings) -> Vec<(NaiveTime, NaiveTime)> {
    let start = minutes_of(settings.working_hours_start);
    let end = minutes_of(settings.working_hours_end);
    let duration = i64::from(settings.slot_duration);
    let step = settings.step_minutes();

    if duration <= 0 || step <= 0 || start >= end {
        return Vec::new();
    }

    let mut times = Vec::new();
    let mut cursor = start;
    while cursor + duration <= end {
        if let (Some(from), Some(to)) = (time_of(cursor), time_of(cursor + duration)) {
            times.push((from, to));
        }
        cursor += step;
    }
    times
}

/// Generate the ordered slot list for `date`.
///
/// Closed weekdays, dates outside the booking horizon and degenerate working
/// hours all yield an empty list. A slot is `pending` or `booked` only when a
/// real reservation holds that exact start time; fictitious records are not
/// consulted here.
pub fn generate_slots_for_date(
    date: NaiveDate,
    settings: &AppointmentSettings,
    reservations: &[Reservation],
    today: NaiveDate,
) -> Vec<Slot> {
    if !settings.working_days.contains(&weekday_number(date)) {
        return Vec::new();
    }
    if !within_horizon(date, settings, today) {
        return Vec::new();
    }

    let occupied: HashMap<NaiveTime, _> = reservations
        .iter()
        .filter_map(Reservation::as_real)
        .filter(|r| r.date == date)
        .map(|r| (r.time, r))
        .collect();

    slot_times(settings)
        .into_iter()
        .map(|(time, end_time)| match occupied.get(&time) {
            Some(real) => Slot {
                date,
                time,
                end_time,
                status: SlotStatus::from(real.status),
                reservation_id: Some(real.id),
            },
            None => Slot {
                date,
                time,
                end_time,
                status: SlotStatus::Available,
                reservation_id: None,
            },
        })
        .collect()
}
