//! Appointment settings repository (PostgreSQL)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::SettingsRepository;
use crate::{error::AppResult, models::AppointmentSettings};

const SETTINGS_COLUMNS: &str = r#"
    working_hours_start, working_hours_end, working_days, slot_duration,
    break_duration, max_advance_booking, fictional_booking_percentage,
    created_at, updated_at
"#;

#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: Pool<Postgres>,
}

impl PgSettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn get(&self) -> AppResult<Option<AppointmentSettings>> {
        let query = format!("SELECT {} FROM appointment_settings WHERE id = 1", SETTINGS_COLUMNS);
        let row = sqlx::query_as::<_, AppointmentSettings>(&query)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_if_absent(
        &self,
        settings: &AppointmentSettings,
    ) -> AppResult<(AppointmentSettings, bool)> {
        let insert = format!(
            r#"
            INSERT INTO appointment_settings (
                id, working_hours_start, working_hours_end, working_days, slot_duration,
                break_duration, max_advance_booking, fictional_booking_percentage,
                created_at, updated_at
            )
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        );

        let created = sqlx::query_as::<_, AppointmentSettings>(&insert)
            .bind(settings.working_hours_start)
            .bind(settings.working_hours_end)
            .bind(&settings.working_days)
            .bind(settings.slot_duration)
            .bind(settings.break_duration)
            .bind(settings.max_advance_booking)
            .bind(settings.fictional_booking_percentage)
            .bind(settings.created_at)
            .bind(settings.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        match created {
            Some(row) => Ok((row, true)),
            None => {
                let query = format!(
                    "SELECT {} FROM appointment_settings WHERE id = 1",
                    SETTINGS_COLUMNS
                );
                let existing = sqlx::query_as::<_, AppointmentSettings>(&query)
                    .fetch_one(&self.pool)
                    .await?;
                Ok((existing, false))
            }
        }
    }

    async fn update(
        &self,
        settings: &AppointmentSettings,
    ) -> AppResult<Option<AppointmentSettings>> {
        let query = format!(
            r#"
            UPDATE appointment_settings SET
                working_hours_start = $1, working_hours_end = $2, working_days = $3,
                slot_duration = $4, break_duration = $5, max_advance_booking = $6,
                fictional_booking_percentage = $7, updated_at = $8
            WHERE id = 1
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        );

        let row = sqlx::query_as::<_, AppointmentSettings>(&query)
            .bind(settings.working_hours_start)
            .bind(settings.working_hours_end)
            .bind(&settings.working_days)
            .bind(settings.slot_duration)
            .bind(settings.break_duration)
            .bind(settings.max_advance_booking)
            .bind(settings.fictional_booking_percentage)
            .bind(settings.updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
