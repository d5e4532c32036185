//! Data models for Hypnos

pub mod admin;
pub mod appointment;
pub mod client;
pub mod settings;

// Re-export commonly used types
pub use admin::AdminClaims;
pub use appointment::{
    Contact, FictitiousReservation, NewReservation, RealReservation, Reservation,
    ReservationStatus, Slot, SlotStatus,
};
pub use client::ClientRecord;
pub use settings::AppointmentSettings;
