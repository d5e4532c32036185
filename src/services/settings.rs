//! Settings service

use crate::{
    config::AppointmentDefaults,
    error::{AppError, AppResult},
    models::{settings::UpdateSettings, AppointmentSettings},
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    defaults: AppointmentDefaults,
}

impl SettingsService {
    pub fn new(repository: Repository, defaults: AppointmentDefaults) -> Self {
        Self { repository, defaults }
    }

    /// Get current settings
    pub async fn get(&self) -> AppResult<AppointmentSettings> {
        self.repository
            .settings
            .get()
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Appointment settings are not initialized".to_string())
            })
    }

    /// Create the settings document from configured defaults unless one exists.
    /// The flag tells whether this call created it.
    pub async fn initialize(&self) -> AppResult<(AppointmentSettings, bool)> {
        let initial = AppointmentSettings::from_defaults(&self.defaults)?;
        let (settings, created) = self.repository.settings.insert_if_absent(&initial).await?;
        if created {
            tracing::info!("Appointment settings initialized from defaults");
        }
        Ok((settings, created))
    }

    /// Apply a partial update
    pub async fn update(&self, patch: &UpdateSettings) -> AppResult<AppointmentSettings> {
        let next = self.get().await?.apply(patch)?;
        let saved = self
            .repository
            .settings
            .update(&next)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Appointment settings are not initialized".to_string())
            })?;
        tracing::info!(
            slot_duration = saved.slot_duration,
            break_duration = saved.break_duration,
            fictional_booking_percentage = saved.fictional_booking_percentage,
            "Appointment settings updated"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SettingsService {
        SettingsService::new(Repository::in_memory(), AppointmentDefaults::default())
    }

    #[tokio::test]
    async fn test_get_before_init_is_not_found() {
        assert!(matches!(service().get().await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initialize_once() {
        let svc = service();
        let (first, created) = svc.initialize().await.unwrap();
        assert!(created);

        let (second, created) = svc.initialize().await.unwrap();
        assert!(!created);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_update_validates_and_persists() {
        let svc = service();
        svc.initialize().await.unwrap();

        let bad = UpdateSettings { slot_duration: Some(0), ..Default::default() };
        assert!(matches!(svc.update(&bad).await, Err(AppError::InvalidConfiguration(_))));

        let good = UpdateSettings {
            working_hours_start: Some("10:00".to_string()),
            fictional_booking_percentage: Some(25),
            ..Default::default()
        };
        let updated = svc.update(&good).await.unwrap();
        assert_eq!(updated.fictional_booking_percentage, 25);
        assert_eq!(svc.get().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_invalid_defaults_are_rejected() {
        let defaults = AppointmentDefaults {
            working_hours_start: "18:00".to_string(),
            working_hours_end: "08:00".to_string(),
            ..Default::default()
        };
        let svc = SettingsService::new(Repository::in_memory(), defaults);
        assert!(matches!(svc.initialize().await, Err(AppError::InvalidConfiguration(_))));
    }
}
