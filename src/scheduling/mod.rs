//! Appointment availability engine
//!
//! Turns the appointment settings and the stored reservations into the slot
//! list of a day, and decides where decorative occupancy goes.

pub mod fictitious;
pub mod slots;

pub use fictitious::{apply_fictitious_overlay, fictitious_target, plan_fictitious_slots};
pub use slots::{generate_slots_for_date, horizon_end, weekday_number, within_horizon};
