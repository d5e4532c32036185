//! Decorative occupancy: overlay and seeding plan

use std::collections::HashMap;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::models::{Reservation, Slot, SlotStatus};

fn fictitious_times(slots: &[Slot], reservations: &[Reservation]) -> HashMap<NaiveTime, Uuid> {
    let date = match slots.first() {
        Some(slot) => slot.date,
        None => return HashMap::new(),
    };
    reservations
        .iter()
        .filter(|r| r.is_fictitious() && r.date() == date)
        .map(|r| (r.time(), r.id()))
        .collect()
}

/// Mark available slots that carry a fictitious record as `fictitious`.
///
/// Slots held by a real reservation keep their real status.
pub fn apply_fictitious_overlay(slots: Vec<Slot>, reservations: &[Reservation]) -> Vec<Slot> {
    let fakes = fictitious_times(&slots, reservations);
    slots
        .into_iter()
        .map(|mut slot| {
            if slot.status == SlotStatus::Available {
                if let Some(id) = fakes.get(&slot.time) {
                    slot.status = SlotStatus::Fictitious;
                    slot.reservation_id = Some(*id);
                }
            }
            slot
        })
        .collect()
}

/// Number of available slots that should look occupied
pub fn fictitious_target(available: usize, percentage: i16) -> usize {
    let pct = f64::from(percentage.clamp(0, 100));
    ((available as f64) * pct / 100.0).round() as usize
}

/// Pick the slot times that still need a fictitious record.
///
/// `slots` is the real view of one day (before any overlay). Already seeded
/// slots count toward the target, so planning again after a seed returns
/// nothing. New picks go to the earliest free slots first.
pub fn plan_fictitious_slots(
    slots: &[Slot],
    reservations: &[Reservation],
    percentage: i16,
) -> Vec<NaiveTime> {
    let fakes = fictitious_times(slots, reservations);
    let available: Vec<&Slot> = slots
        .iter()
        .filter(|s| s.status == SlotStatus::Available)
        .collect();

    let target = fictitious_target(available.len(), percentage);
    let seeded = available.iter().filter(|s| fakes.contains_key(&s.time)).count();
    let missing = target.saturating_sub(seeded);

    let mut free: Vec<NaiveTime> = available
        .iter()
        .filter(|s| !fakes.contains_key(&s.time))
        .map(|s| s.time)
        .collect();
    free.sort();
    free.truncate(missing);
    free
}
