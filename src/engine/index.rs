// src/engine/index.rs

use std::collections::HashMap;

use crate::models::{Appointment, EntityId, Service, User};

pub trait Keyed {
    fn key(&self) -> &EntityId;
}

impl Keyed for User {
    fn key(&self) -> &EntityId {
        &self.user_id
    }
}

impl Keyed for Service {
    fn key(&self) -> &EntityId {
        &self.service_id
    }
}

/// id -> entity. Duplicate ids: the later entry wins.
pub fn index_by_id<T: Keyed>(entities: &[T]) -> HashMap<&EntityId, &T> {
    entities.iter().map(|e| (e.key(), e)).collect()
}

pub fn is_patient(user: &User) -> bool {
    user.user_type.trim().eq_ignore_ascii_case("patient")
}

/// Appointments per patient. Unknown users and non-patient users are skipped.
pub fn count_appointments_per_patient<'a>(
    appointments: &'a [Appointment],
    users: &HashMap<&EntityId, &User>,
) -> HashMap<&'a EntityId, usize> {
    let mut counts: HashMap<&EntityId, usize> = HashMap::new();
    for appt in appointments {
        let Some(id) = appt.user_id.as_ref() else {
            continue;
        };
        let Some(user) = users.get(id) else {
            continue;
        };
        if !is_patient(user) {
            continue;
        }
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

/// Joined lookups over the fetched lists. Every lookup can miss.
pub struct Lookups<'a> {
    users: HashMap<&'a EntityId, &'a User>,
    services: HashMap<&'a EntityId, &'a Service>,
    patient_counts: HashMap<&'a EntityId, usize>,
}

impl<'a> Lookups<'a> {
    /// `appointments` must be the full, unfiltered list.
    pub fn build(appointments: &'a [Appointment], users: &'a [User], services: &'a [Service]) -> Self {
        let users = index_by_id(users);
        let patient_counts = count_appointments_per_patient(appointments, &users);
        Lookups {
            users,
            services: index_by_id(services),
            patient_counts,
        }
    }

    // Lookups take `&EntityId` or a nullable reference; `None` always misses.

    pub fn user<'b>(&self, id: impl Into<Option<&'b EntityId>>) -> Option<&'a User> {
        id.into().and_then(|id| self.users.get(id).copied())
    }

    pub fn patient<'b>(&self, id: impl Into<Option<&'b EntityId>>) -> Option<&'a User> {
        self.user(id).filter(|u| is_patient(u))
    }

    pub fn service<'b>(&self, id: impl Into<Option<&'b EntityId>>) -> Option<&'a Service> {
        id.into().and_then(|id| self.services.get(id).copied())
    }

    /// All-time appointment count of a patient; 0 if unknown or not a patient.
    pub fn patient_count<'b>(&self, id: impl Into<Option<&'b EntityId>>) -> usize {
        id.into()
            .and_then(|id| self.patient_counts.get(id).copied())
            .unwrap_or(0)
    }

    /// `first last` of the user, or an empty string when unresolved.
    pub fn display_name<'b>(&self, id: impl Into<Option<&'b EntityId>>) -> String {
        self.user(id).map(User::full_name).unwrap_or_default()
    }
}
