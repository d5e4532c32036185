//! Appointments service: availability, booking lifecycle and decorative occupancy

use chrono::{Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{parse_date, BookingRequest, DayAvailability},
        settings::parse_wall_time,
        AppointmentSettings, Contact, NewReservation, RealReservation, Reservation, Slot,
        SlotStatus,
    },
    repository::Repository,
    scheduling::{self, apply_fictitious_overlay, generate_slots_for_date, plan_fictitious_slots},
};

/// Longest date range served by a single request
pub const MAX_RANGE_DAYS: i64 = 62;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9 ().-]{6,20}$").expect("phone pattern is valid")
});

#[derive(Clone)]
pub struct AppointmentsService {
    repository: Repository,
    fixed_today: Option<NaiveDate>,
}

impl AppointmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository, fixed_today: None }
    }

    /// Pin "today" instead of reading the wall clock
    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Local::now().date_naive())
    }

    async fn settings(&self) -> AppResult<AppointmentSettings> {
        self.repository
            .settings
            .get()
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Appointment settings are not initialized".to_string())
            })
    }

    /// Real occupancy of a day, fictitious records ignored
    async fn real_slots(
        &self,
        date: NaiveDate,
        settings: &AppointmentSettings,
    ) -> AppResult<(Vec<Slot>, Vec<Reservation>)> {
        let reservations = self.repository.appointments.list_for_date(date).await?;
        let slots = generate_slots_for_date(date, settings, &reservations, self.today());
        Ok((slots, reservations))
    }

    // ---- Availability ----

    /// Slots of a day as shown to visitors
    pub async fn availability(&self, date: NaiveDate) -> AppResult<Vec<Slot>> {
        Ok(self
            .admin_availability(date)
            .await?
            .into_iter()
            .map(Slot::public_view)
            .collect())
    }

    /// Slots of a day with decorative occupancy shown as such
    pub async fn admin_availability(&self, date: NaiveDate) -> AppResult<Vec<Slot>> {
        let settings = self.settings().await?;
        let (slots, reservations) = self.real_slots(date, &settings).await?;
        Ok(apply_fictitious_overlay(slots, &reservations))
    }

    /// Public slots for every day of a range, clamped to the booking horizon
    pub async fn availability_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DayAvailability>> {
        check_range(start, end)?;
        let settings = self.settings().await?;
        let today = self.today();

        let first = start.max(today);
        let last = end.min(scheduling::horizon_end(&settings, today));
        if first > last {
            return Ok(Vec::new());
        }

        let reservations = self.repository.appointments.list_range(first, last).await?;
        let days = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|date| {
                let day: Vec<Reservation> =
                    reservations.iter().filter(|r| r.date() == date).cloned().collect();
                let slots = generate_slots_for_date(date, &settings, &day, today);
                DayAvailability {
                    date,
                    slots: apply_fictitious_overlay(slots, &day)
                        .into_iter()
                        .map(Slot::public_view)
                        .collect(),
                }
            })
            .collect();
        Ok(days)
    }

    // ---- Booking lifecycle ----

    /// Book a free slot. The slot ends up `pending` until an admin confirms it.
    pub async fn book(&self, request: &BookingRequest) -> AppResult<RealReservation> {
        request.validate()?;
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("name: Name is required".to_string()));
        }
        if !PHONE_RE.is_match(request.phone.trim()) {
            return Err(AppError::Validation("phone: Invalid phone number".to_string()));
        }
        let date = parse_date(&request.date, "date")?;
        let time = parse_wall_time(&request.time, "time")?;

        let settings = self.settings().await?;
        let (slots, _) = self.real_slots(date, &settings).await?;
        let slot = slots.iter().find(|s| s.time == time).ok_or_else(|| {
            AppError::Validation(format!(
                "{} {} is not a bookable slot",
                date,
                time.format("%H:%M")
            ))
        })?;
        if slot.status != SlotStatus::Available {
            return Err(AppError::Conflict(format!(
                "Slot {} {} is no longer available",
                date,
                time.format("%H:%M")
            )));
        }

        let data = NewReservation {
            date,
            time,
            contact: Contact {
                name: request.name.trim().to_string(),
                email: request.email.trim().to_lowercase(),
                phone: request.phone.trim().to_string(),
            },
            notes: request
                .notes
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        // The storage layer arbitrates concurrent attempts on the same slot
        let created = self.repository.appointments.insert_real(&data).await?.ok_or_else(|| {
            tracing::debug!(%date, %time, "Booking lost the race for slot");
            AppError::Conflict(format!(
                "Slot {} {} is no longer available",
                date,
                time.format("%H:%M")
            ))
        })?;

        tracing::info!(id = %created.id, %date, %time, "Appointment requested");
        Ok(created)
    }

    /// Admin confirmation: `pending -> booked`
    pub async fn confirm(&self, id: Uuid) -> AppResult<RealReservation> {
        if let Some(confirmed) = self.repository.appointments.confirm_pending(id).await? {
            tracing::info!(id = %id, "Appointment confirmed");
            return Ok(confirmed);
        }
        match self.repository.appointments.get(id).await? {
            None => Err(AppError::NotFound(format!("Appointment {} not found", id))),
            Some(Reservation::Fictitious(_)) => Err(AppError::Conflict(format!(
                "Appointment {} is fictitious and cannot be confirmed",
                id
            ))),
            Some(Reservation::Real(_)) => Err(AppError::Conflict(format!(
                "Appointment {} is already confirmed",
                id
            ))),
        }
    }

    /// Free a pending or booked slot
    pub async fn cancel(&self, id: Uuid) -> AppResult<()> {
        match self.repository.appointments.get(id).await? {
            None => Err(AppError::NotFound(format!("Appointment {} not found", id))),
            Some(Reservation::Fictitious(_)) => Err(AppError::Conflict(format!(
                "Appointment {} is fictitious and cannot be cancelled",
                id
            ))),
            Some(Reservation::Real(_)) => {
                if !self.repository.appointments.delete_real(id).await? {
                    return Err(AppError::NotFound(format!("Appointment {} not found", id)));
                }
                tracing::info!(id = %id, "Appointment cancelled");
                Ok(())
            }
        }
    }

    /// Get one real reservation
    pub async fn get(&self, id: Uuid) -> AppResult<RealReservation> {
        self.repository
            .appointments
            .get(id)
            .await?
            .and_then(Reservation::into_real)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Real reservations of a date range
    pub async fn list(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<RealReservation>> {
        if start > end {
            return Err(AppError::Validation("start_date must not be after end_date".to_string()));
        }
        Ok(self
            .repository
            .appointments
            .list_range(start, end)
            .await?
            .into_iter()
            .filter_map(Reservation::into_real)
            .collect())
    }

    // ---- Decorative occupancy ----

    /// Top up a day's fictitious records to the configured percentage
    pub async fn seed_fictitious(&self, date: NaiveDate) -> AppResult<u64> {
        let settings = self.settings().await?;
        self.seed_day(date, &settings).await
    }

    pub async fn seed_fictitious_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<u64> {
        check_range(start, end)?;
        let settings = self.settings().await?;
        let mut inserted = 0;
        for date in start.iter_days().take_while(|d| *d <= end) {
            inserted += self.seed_day(date, &settings).await?;
        }
        Ok(inserted)
    }

    async fn seed_day(&self, date: NaiveDate, settings: &AppointmentSettings) -> AppResult<u64> {
        let (slots, reservations) = self.real_slots(date, settings).await?;
        let plan =
            plan_fictitious_slots(&slots, &reservations, settings.fictional_booking_percentage);

        let mut inserted = 0;
        for time in plan {
            if self.repository.appointments.insert_fictitious(date, time).await? {
                inserted += 1;
            }
        }
        if inserted > 0 {
            tracing::info!(%date, inserted, "Fictitious slots seeded");
        }
        Ok(inserted)
    }

    /// Remove every fictitious record
    pub async fn purge_fictitious(&self) -> AppResult<u64> {
        let removed = self.repository.appointments.purge_fictitious().await?;
        tracing::info!(removed, "Fictitious slots purged");
        Ok(removed)
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::Validation("start_date must not be after end_date".to_string()));
    }
    if end - start >= Duration::days(MAX_RANGE_DAYS) {
        return Err(AppError::Validation(format!(
            "Date range is limited to {} days",
            MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{settings::UpdateSettings, ReservationStatus},
        repository::{MockAppointmentsRepository, MockSettingsRepository},
        services::settings::SettingsService,
        config::AppointmentDefaults,
    };
    use chrono::NaiveTime;
    use std::sync::Arc;

    // 2026-03-02 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// 09:00-12:00, hourly, Monday to Friday
    async fn setup(percentage: i16) -> AppointmentsService {
        let repository = Repository::in_memory();
        let settings = SettingsService::new(repository.clone(), AppointmentDefaults::default());
        settings.initialize().await.unwrap();
        settings
            .update(&UpdateSettings {
                working_hours_start: Some("09:00".to_string()),
                working_hours_end: Some("12:00".to_string()),
                working_days: Some(vec![1, 2, 3, 4, 5]),
                slot_duration: Some(60),
                break_duration: Some(0),
                max_advance_booking: Some(30),
                fictional_booking_percentage: Some(percentage),
            })
            .await
            .unwrap();
        AppointmentsService::new(repository).with_fixed_today(monday())
    }

    fn request(time: &str, email: &str) -> BookingRequest {
        BookingRequest {
            date: "2026-03-02".to_string(),
            time: time.to_string(),
            name: "Jo Client".to_string(),
            email: email.to_string(),
            phone: "+33 6 12 34 56 78".to_string(),
            notes: Some("  first visit ".to_string()),
        }
    }

    fn statuses(slots: &[Slot]) -> Vec<SlotStatus> {
        slots.iter().map(|s| s.status).collect()
    }

    #[tokio::test]
    async fn test_book_then_view_shows_pending() {
        let svc = setup(0).await;
        let before = svc.availability(monday()).await.unwrap();
        assert_eq!(
            before.iter().map(|s| s.time).collect::<Vec<_>>(),
            vec![t(9, 0), t(10, 0), t(11, 0)]
        );
        assert_eq!(statuses(&before), vec![SlotStatus::Available; 3]);

        let created = svc.book(&request("09:00", "Jo@Example.com")).await.unwrap();
        assert_eq!(created.status, ReservationStatus::Pending);
        assert_eq!(created.contact.email, "jo@example.com");
        assert_eq!(created.notes.as_deref(), Some("first visit"));

        let after = svc.availability(monday()).await.unwrap();
        assert_eq!(
            statuses(&after),
            vec![SlotStatus::Pending, SlotStatus::Available, SlotStatus::Available]
        );
    }

    #[tokio::test]
    async fn test_double_booking_conflicts() {
        let svc = setup(0).await;
        svc.book(&request("10:00", "a@example.com")).await.unwrap();
        let second = svc.book(&request("10:00", "b@example.com")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_concurrent_booking_has_one_winner() {
        let svc = setup(0).await;
        let first = request("11:00", "a@example.com");
        let second = request("11:00", "b@example.com");
        let (a, b) = tokio::join!(svc.book(&first), svc.book(&second));
        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            outcomes.iter().filter(|r| matches!(r, Err(AppError::Conflict(_)))).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_booking_validation() {
        let svc = setup(0).await;

        let mut bad_email = request("09:00", "not-an-email");
        assert!(matches!(svc.book(&bad_email).await, Err(AppError::Validation(_))));

        bad_email.email = "ok@example.com".to_string();
        bad_email.name = String::new();
        assert!(matches!(svc.book(&bad_email).await, Err(AppError::Validation(_))));

        let mut blank_name = request("09:00", "ok@example.com");
        blank_name.name = "   ".to_string();
        assert!(matches!(svc.book(&blank_name).await, Err(AppError::Validation(_))));

        let mut bad_phone = request("09:00", "ok@example.com");
        bad_phone.phone = "call me maybe".to_string();
        assert!(matches!(svc.book(&bad_phone).await, Err(AppError::Validation(_))));

        // Off-grid time
        let off_grid = request("09:30", "ok@example.com");
        assert!(matches!(svc.book(&off_grid).await, Err(AppError::Validation(_))));

        // Sunday is closed
        let mut sunday = request("09:00", "ok@example.com");
        sunday.date = "2026-03-08".to_string();
        assert!(matches!(svc.book(&sunday).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_confirm_and_cancel_transitions() {
        let svc = setup(0).await;
        let created = svc.book(&request("09:00", "a@example.com")).await.unwrap();

        let confirmed = svc.confirm(created.id).await.unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Booked);
        assert!(matches!(svc.confirm(created.id).await, Err(AppError::Conflict(_))));

        let view = svc.availability(monday()).await.unwrap();
        assert_eq!(view[0].status, SlotStatus::Booked);

        svc.cancel(created.id).await.unwrap();
        assert!(matches!(svc.cancel(created.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.confirm(Uuid::new_v4()).await, Err(AppError::NotFound(_))));

        let view = svc.availability(monday()).await.unwrap();
        assert_eq!(view[0].status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent_and_purge_spares_real() {
        // 3 slots, 70% -> 2 fictitious
        let svc = setup(70).await;
        let real = svc.book(&request("09:00", "a@example.com")).await.unwrap();

        // 2 available slots left in the real view, 70% of 2 rounds to 1
        assert_eq!(svc.seed_fictitious(monday()).await.unwrap(), 1);
        assert_eq!(svc.seed_fictitious(monday()).await.unwrap(), 0);

        let admin = svc.admin_availability(monday()).await.unwrap();
        assert_eq!(
            statuses(&admin),
            vec![SlotStatus::Pending, SlotStatus::Fictitious, SlotStatus::Available]
        );
        let public = svc.availability(monday()).await.unwrap();
        assert_eq!(
            statuses(&public),
            vec![SlotStatus::Pending, SlotStatus::Booked, SlotStatus::Available]
        );

        // A fictitious slot can still be booked for real
        let taken = svc.book(&request("10:00", "b@example.com")).await.unwrap();
        assert_eq!(taken.time, t(10, 0));

        svc.seed_fictitious(monday()).await.unwrap();
        assert_eq!(svc.purge_fictitious().await.unwrap(), 1);
        assert_eq!(svc.purge_fictitious().await.unwrap(), 0);

        assert!(svc.get(real.id).await.is_ok());
        assert!(svc.get(taken.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_fictitious_records_cannot_be_confirmed_or_cancelled() {
        let svc = setup(100).await;
        svc.seed_fictitious(monday()).await.unwrap();
        let admin = svc.admin_availability(monday()).await.unwrap();
        let fake_id = admin[0].reservation_id.unwrap();

        assert!(matches!(svc.confirm(fake_id).await, Err(AppError::Conflict(_))));
        assert!(matches!(svc.cancel(fake_id).await, Err(AppError::Conflict(_))));
        assert!(matches!(svc.get(fake_id).await, Err(AppError::NotFound(_))));
        assert!(svc.list(monday(), monday()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_range_is_clamped_to_horizon() {
        let svc = setup(0).await;
        let days = svc
            .availability_range(monday() - Duration::days(3), monday() + Duration::days(40))
            .await
            .unwrap();
        assert_eq!(days.first().map(|d| d.date), Some(monday()));
        assert_eq!(days.last().map(|d| d.date), Some(monday() + Duration::days(30)));

        let too_long = svc.availability_range(monday(), monday() + Duration::days(90)).await;
        assert!(matches!(too_long, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_seed_range_counts_all_days() {
        let svc = setup(100).await;
        // Monday to Sunday: 5 open days x 3 slots
        let inserted = svc
            .seed_fictitious_range(monday(), monday() + Duration::days(6))
            .await
            .unwrap();
        assert_eq!(inserted, 15);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_as_service_error() {
        let mut settings = MockSettingsRepository::new();
        settings.expect_get().returning(|| {
            Ok(Some(
                AppointmentSettings::from_defaults(&AppointmentDefaults::default()).unwrap(),
            ))
        });
        let mut appointments = MockAppointmentsRepository::new();
        appointments
            .expect_list_for_date()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let repository = Repository::from_parts(Arc::new(settings), Arc::new(appointments));
        let svc = AppointmentsService::new(repository).with_fixed_today(monday());
        assert!(matches!(
            svc.availability(monday()).await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_settings_is_not_found() {
        let svc = AppointmentsService::new(Repository::in_memory());
        assert!(matches!(svc.availability(monday()).await, Err(AppError::NotFound(_))));
    }
}
