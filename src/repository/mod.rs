//! Repository layer for database operations
//!
//! Services talk to storage through the traits below. PostgreSQL is the
//! production backend; the in-memory backend honours the same uniqueness rules
//! and backs the test suite.

pub mod appointments;
pub mod memory;
pub mod settings;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AppointmentSettings, NewReservation, RealReservation, Reservation},
};

/// Storage for the singleton settings document
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> AppResult<Option<AppointmentSettings>>;

    /// Insert `settings` unless a document exists. Returns the stored document
    /// and whether it was created by this call.
    async fn insert_if_absent(
        &self,
        settings: &AppointmentSettings,
    ) -> AppResult<(AppointmentSettings, bool)>;

    /// Replace the stored document; `None` when it was never initialized
    async fn update(
        &self,
        settings: &AppointmentSettings,
    ) -> AppResult<Option<AppointmentSettings>>;
}

/// Storage for real and fictitious reservations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentsRepository: Send + Sync {
    async fn list_for_date(&self, date: NaiveDate) -> AppResult<Vec<Reservation>>;

    /// All reservations with `start <= date <= end`, ordered by date then time
    async fn list_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Reservation>>;

    async fn list_real(&self) -> AppResult<Vec<RealReservation>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Reservation>>;

    /// Atomically insert a pending real reservation unless another real one
    /// already holds the slot (`None`). Any fictitious record on the slot is
    /// removed in the same step.
    async fn insert_real(&self, data: &NewReservation) -> AppResult<Option<RealReservation>>;

    /// Insert a fictitious record; `false` when the slot already had one
    async fn insert_fictitious(&self, date: NaiveDate, time: NaiveTime) -> AppResult<bool>;

    /// `pending -> booked`; `None` when no pending real reservation has this id
    async fn confirm_pending(&self, id: Uuid) -> AppResult<Option<RealReservation>>;

    /// Delete a real reservation; `false` when none has this id
    async fn delete_real(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every fictitious record, returning how many were removed
    async fn purge_fictitious(&self) -> AppResult<u64>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub settings: Arc<dyn SettingsRepository>,
    pub appointments: Arc<dyn AppointmentsRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            settings: Arc::new(settings::PgSettingsRepository::new(pool.clone())),
            appointments: Arc::new(appointments::PgAppointmentsRepository::new(pool)),
        }
    }

    /// Repository backed by process memory
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            settings: Arc::new(store.clone()),
            appointments: Arc::new(store),
        }
    }

    pub fn from_parts(
        settings: Arc<dyn SettingsRepository>,
        appointments: Arc<dyn AppointmentsRepository>,
    ) -> Self {
        Self { settings, appointments }
    }
}
