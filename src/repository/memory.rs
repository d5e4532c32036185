//! In-memory storage backend
//!
//! Every write runs under one lock, which gives the same guarantees as the
//! PostgreSQL unique indexes: one real and one fictitious record per slot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AppointmentsRepository, SettingsRepository};
use crate::{
    error::AppResult,
    models::{
        AppointmentSettings, FictitiousReservation, NewReservation, RealReservation, Reservation,
        ReservationStatus,
    },
};

#[derive(Default)]
struct MemoryState {
    settings: Option<AppointmentSettings>,
    reservations: Vec<Reservation>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

fn sorted(mut reservations: Vec<Reservation>) -> Vec<Reservation> {
    reservations.sort_by_key(|r| (r.date(), r.time()));
    reservations
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn get(&self) -> AppResult<Option<AppointmentSettings>> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn insert_if_absent(
        &self,
        settings: &AppointmentSettings,
    ) -> AppResult<(AppointmentSettings, bool)> {
        let mut state = self.state.write().await;
        match &state.settings {
            Some(existing) => Ok((existing.clone(), false)),
            None => {
                state.settings = Some(settings.clone());
                Ok((settings.clone(), true))
            }
        }
    }

    async fn update(
        &self,
        settings: &AppointmentSettings,
    ) -> AppResult<Option<AppointmentSettings>> {
        let mut state = self.state.write().await;
        match state.settings.as_mut() {
            Some(current) => {
                let created_at = current.created_at;
                *current = AppointmentSettings { created_at, ..settings.clone() };
                Ok(Some(current.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AppointmentsRepository for MemoryStore {
    async fn list_for_date(&self, date: NaiveDate) -> AppResult<Vec<Reservation>> {
        let state = self.state.read().await;
        Ok(sorted(
            state.reservations.iter().filter(|r| r.date() == date).cloned().collect(),
        ))
    }

    async fn list_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Reservation>> {
        let state = self.state.read().await;
        Ok(sorted(
            state
                .reservations
                .iter()
                .filter(|r| r.date() >= start && r.date() <= end)
                .cloned()
                .collect(),
        ))
    }

    async fn list_real(&self) -> AppResult<Vec<RealReservation>> {
        let state = self.state.read().await;
        let mut real: Vec<RealReservation> =
            state.reservations.iter().filter_map(Reservation::as_real).cloned().collect();
        real.sort_by_key(|r| (r.date, r.time));
        Ok(real)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        let state = self.state.read().await;
        Ok(state.reservations.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert_real(&self, data: &NewReservation) -> AppResult<Option<RealReservation>> {
        let mut state = self.state.write().await;
        let taken = state
            .reservations
            .iter()
            .filter_map(Reservation::as_real)
            .any(|r| r.date == data.date && r.time == data.time);
        if taken {
            return Ok(None);
        }

        state
            .reservations
            .retain(|r| !(r.is_fictitious() && r.date() == data.date && r.time() == data.time));

        let now = Utc::now();
        let created = RealReservation {
            id: Uuid::new_v4(),
            date: data.date,
            time: data.time,
            contact: data.contact.clone(),
            notes: data.notes.clone(),
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.reservations.push(Reservation::Real(created.clone()));
        Ok(Some(created))
    }

    async fn insert_fictitious(&self, date: NaiveDate, time: NaiveTime) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .reservations
            .iter()
            .any(|r| r.is_fictitious() && r.date() == date && r.time() == time);
        if exists {
            return Ok(false);
        }
        state.reservations.push(Reservation::Fictitious(FictitiousReservation {
            id: Uuid::new_v4(),
            date,
            time,
            created_at: Utc::now(),
        }));
        Ok(true)
    }

    async fn confirm_pending(&self, id: Uuid) -> AppResult<Option<RealReservation>> {
        let mut state = self.state.write().await;
        let found = state.reservations.iter_mut().find_map(|r| match r {
            Reservation::Real(real)
                if real.id == id && real.status == ReservationStatus::Pending =>
            {
                Some(real)
            }
            _ => None,
        });
        Ok(found.map(|real| {
            real.status = ReservationStatus::Booked;
            real.updated_at = Utc::now();
            real.clone()
        }))
    }

    async fn delete_real(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.reservations.len();
        state
            .reservations
            .retain(|r| !(r.id() == id && !r.is_fictitious()));
        Ok(state.reservations.len() < before)
    }

    async fn purge_fictitious(&self) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.reservations.len();
        state.reservations.retain(|r| !r.is_fictitious());
        Ok((before - state.reservations.len()) as u64)
    }
}
