//! Client history derived from real reservations

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use crate::{
    error::AppResult,
    models::{ClientRecord, RealReservation, ReservationStatus},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every client seen in real reservations, sorted by name
    pub async fn list(&self) -> AppResult<Vec<ClientRecord>> {
        let reservations = self.repository.appointments.list_real().await?;
        Ok(aggregate_clients(&reservations, Local::now().date_naive()))
    }
}

/// Fold reservations (ordered by date and time) into one record per email
pub fn aggregate_clients(reservations: &[RealReservation], today: NaiveDate) -> Vec<ClientRecord> {
    let mut by_email: BTreeMap<String, ClientRecord> = BTreeMap::new();

    for r in reservations {
        let key = r.contact.email.trim().to_lowercase();
        let record = by_email.entry(key.clone()).or_insert_with(|| ClientRecord {
            name: r.contact.name.clone(),
            email: key,
            phone: r.contact.phone.clone(),
            visit_count: 0,
            last_visit: None,
            next_appointment: None,
            notes: Vec::new(),
        });

        // Latest reservation wins for contact details
        record.name = r.contact.name.clone();
        record.phone = r.contact.phone.clone();

        if r.date <= today {
            if r.status == ReservationStatus::Booked {
                record.visit_count += 1;
                record.last_visit = record.last_visit.max(Some(r.date));
            }
        } else if record.next_appointment.map_or(true, |next| r.date < next) {
            record.next_appointment = Some(r.date);
        }

        if let Some(note) = r.notes.as_ref().filter(|n| !n.trim().is_empty()) {
            record.notes.push(note.clone());
        }
    }

    let mut clients: Vec<ClientRecord> = by_email.into_values().collect();
    clients.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.email.cmp(&b.email))
    });
    clients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;
    use chrono::{NaiveTime, Utc};
    use uuid::Uuid;

    fn reservation(
        day: u32,
        email: &str,
        name: &str,
        status: ReservationStatus,
        notes: Option<&str>,
    ) -> RealReservation {
        RealReservation {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            contact: Contact {
                name: name.to_string(),
                email: email.to_string(),
                phone: "0600000000".to_string(),
            },
            notes: notes.map(str::to_string),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate_clients() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let reservations = vec![
            reservation(2, "bea@example.com", "Bea", ReservationStatus::Booked, Some("anxiety")),
            reservation(5, "BEA@example.com", "Béatrice", ReservationStatus::Booked, None),
            reservation(6, "al@example.com", "Al", ReservationStatus::Pending, None),
            reservation(20, "bea@example.com", "Béatrice", ReservationStatus::Pending, Some("sleep")),
            reservation(25, "bea@example.com", "Béatrice", ReservationStatus::Booked, None),
        ];

        let clients = aggregate_clients(&reservations, today);
        assert_eq!(clients.len(), 2);

        let al = &clients[0];
        assert_eq!(al.name, "Al");
        assert_eq!(al.visit_count, 0);
        assert_eq!(al.last_visit, None);

        let bea = &clients[1];
        assert_eq!(bea.name, "Béatrice");
        assert_eq!(bea.email, "bea@example.com");
        assert_eq!(bea.visit_count, 2);
        assert_eq!(bea.last_visit, NaiveDate::from_ymd_opt(2026, 3, 5));
        assert_eq!(bea.next_appointment, NaiveDate::from_ymd_opt(2026, 3, 20));
        assert_eq!(bea.notes, vec!["anxiety".to_string(), "sleep".to_string()]);
    }
}
