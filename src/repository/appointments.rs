//! Appointments repository (PostgreSQL)
//!
//! Slot uniqueness lives in the schema: partial unique indexes allow one real
//! and one fictitious row per (slot_date, slot_time). Inserts use
//! `ON CONFLICT DO NOTHING RETURNING` so a lost race shows up as no row.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::AppointmentsRepository;
use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{AppointmentRow, FICTITIOUS_EMAIL, FICTITIOUS_NAME, FICTITIOUS_PHONE},
        NewReservation, RealReservation, Reservation,
    },
};

#[derive(Clone)]
pub struct PgAppointmentsRepository {
    pool: Pool<Postgres>,
}

impl PgAppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn into_reservations(rows: Vec<AppointmentRow>) -> AppResult<Vec<Reservation>> {
    rows.into_iter().map(Reservation::try_from).collect()
}

fn into_real(row: AppointmentRow) -> AppResult<RealReservation> {
    let id = row.id;
    Reservation::try_from(row)?
        .into_real()
        .ok_or_else(|| AppError::Internal(format!("Appointment {} is not a real reservation", id)))
}

#[async_trait]
impl AppointmentsRepository for PgAppointmentsRepository {
    async fn list_for_date(&self, date: NaiveDate) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            "SELECT * FROM appointments WHERE slot_date = $1 ORDER BY slot_time",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        into_reservations(rows)
    }

    async fn list_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT * FROM appointments
            WHERE slot_date >= $1 AND slot_date <= $2
            ORDER BY slot_date, slot_time
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        into_reservations(rows)
    }

    async fn list_real(&self) -> AppResult<Vec<RealReservation>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            "SELECT * FROM appointments WHERE kind = 'real' ORDER BY slot_date, slot_time",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(into_real).collect()
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, AppointmentRow>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Reservation::try_from)
            .transpose()
    }

    async fn insert_real(&self, data: &NewReservation) -> AppResult<Option<RealReservation>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            INSERT INTO appointments (
                id, slot_date, slot_time, kind, status, name, email, phone, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, 'real', 'pending', $4, $5, $6, $7, $8, $8)
            ON CONFLICT (slot_date, slot_time) WHERE kind = 'real' DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.date)
        .bind(data.time)
        .bind(&data.contact.name)
        .bind(&data.contact.email)
        .bind(&data.contact.phone)
        .bind(&data.notes)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "DELETE FROM appointments WHERE kind = 'fictitious' AND slot_date = $1 AND slot_time = $2",
        )
        .bind(data.date)
        .bind(data.time)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        into_real(row).map(Some)
    }

    async fn insert_fictitious(&self, date: NaiveDate, time: NaiveTime) -> AppResult<bool> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO appointments (
                id, slot_date, slot_time, kind, status, name, email, phone, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, 'fictitious', 'fictitious', $4, $5, $6, NULL, $7, $7)
            ON CONFLICT (slot_date, slot_time) WHERE kind = 'fictitious' DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(date)
        .bind(time)
        .bind(FICTITIOUS_NAME)
        .bind(FICTITIOUS_EMAIL)
        .bind(FICTITIOUS_PHONE)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn confirm_pending(&self, id: Uuid) -> AppResult<Option<RealReservation>> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            UPDATE appointments SET status = 'booked', updated_at = $2
            WHERE id = $1 AND kind = 'real' AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        row.map(into_real).transpose()
    }

    async fn delete_real(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1 AND kind = 'real'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_fictitious(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM appointments WHERE kind = 'fictitious' OR status = 'fictitious'",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
