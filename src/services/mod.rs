//! Business logic services

pub mod appointments;
pub mod auth;
pub mod clients;
pub mod settings;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub settings: settings::SettingsService,
    pub appointments: appointments::AppointmentsService,
    pub clients: clients::ClientsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(config.auth.clone()),
            settings: settings::SettingsService::new(
                repository.clone(),
                config.appointments.clone(),
            ),
            appointments: appointments::AppointmentsService::new(repository.clone()),
            clients: clients::ClientsService::new(repository),
        }
    }
}
