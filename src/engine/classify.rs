// src/engine/classify.rs

use serde::Serialize;

use crate::engine::index::Lookups;
use crate::models::{Appointment, BookingStatus, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatientKind {
    New,
    Existing,
}

impl PatientKind {
    /// From the patient's all-time appointment count.
    pub fn classify(count: usize) -> Option<PatientKind> {
        match count {
            0 => None,
            1 => Some(PatientKind::New),
            _ => Some(PatientKind::Existing),
        }
    }
}

/// Only new patients must bring a transfer letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "url")]
pub enum TransferLetter {
    NotRequired,
    Uploaded(String),
    Missing,
}

impl TransferLetter {
    pub fn for_appointment(kind: Option<PatientKind>, letter: Option<&str>) -> Self {
        if kind != Some(PatientKind::New) {
            return TransferLetter::NotRequired;
        }
        match letter.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => TransferLetter::Uploaded(url.to_string()),
            None => TransferLetter::Missing,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentRow {
    pub appointment_id: EntityId,
    pub appointment_date: String,
    pub patient_name: String,
    pub contact: String,
    pub service_name: String,
    pub patient_type: Option<PatientKind>,
    pub status: BookingStatus,
    pub transfer_letter: TransferLetter,
}

pub fn shape_row(appt: &Appointment, lookups: &Lookups<'_>) -> AppointmentRow {
    let user = lookups.user(appt.user_id.as_ref());
    let kind = PatientKind::classify(lookups.patient_count(appt.user_id.as_ref()));

    AppointmentRow {
        appointment_id: appt.appointment_id.clone(),
        appointment_date: appt.appointment_date.clone(),
        patient_name: user.map(|u| u.full_name()).unwrap_or_default(),
        contact: user.map(|u| u.phone_number.clone()).unwrap_or_default(),
        service_name: lookups
            .service(appt.service_id.as_ref())
            .map(|s| s.service_name.clone())
            .unwrap_or_default(),
        patient_type: kind,
        status: appt.booking_status,
        transfer_letter: TransferLetter::for_appointment(kind, appt.transfer_letter.as_deref()),
    }
}

pub fn shape_rows(appointments: &[&Appointment], lookups: &Lookups<'_>) -> Vec<AppointmentRow> {
    appointments.iter().map(|a| shape_row(a, lookups)).collect()
}
