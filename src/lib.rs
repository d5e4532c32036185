//! Hypnos appointment server
//!
//! REST JSON API behind the booking calendar and admin panel of a
//! hypnotherapy practice: slot availability, booking lifecycle and
//! decorative occupancy of the public calendar.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: &AppConfig, repository: repository::Repository) -> Self {
        Self {
            services: Arc::new(services::Services::new(repository, config)),
        }
    }
}
