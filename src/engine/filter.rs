// src/engine/filter.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::index::Lookups;
use crate::engine::time_range::{DateRange, parse_appointment_date};
use crate::models::{Appointment, BookingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    All,
    Upcoming,
    Completed,
    Cancelled,
}

impl Tab {
    pub fn matches(self, status: BookingStatus) -> bool {
        match self {
            Tab::All => true,
            Tab::Upcoming => status == BookingStatus::Upcoming,
            Tab::Completed => status == BookingStatus::Completed,
            Tab::Cancelled => status == BookingStatus::Cancelled,
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Tab::All),
            "upcoming" => Ok(Tab::Upcoming),
            "completed" => Ok(Tab::Completed),
            "cancelled" => Ok(Tab::Cancelled),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}

/// Everything the appointments page lets the user change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentQuery {
    pub range: DateRange,
    pub search: String,
    pub tab: Tab,
    pub page: usize,
}

impl AppointmentQuery {
    pub fn new(range: DateRange) -> Self {
        AppointmentQuery {
            range,
            search: String::new(),
            tab: Tab::All,
            page: 1,
        }
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        AppointmentQuery {
            search: search.into(),
            page: 1,
            ..self
        }
    }

    pub fn with_tab(self, tab: Tab) -> Self {
        AppointmentQuery { tab, page: 1, ..self }
    }

    pub fn with_page(self, page: usize) -> Self {
        AppointmentQuery { page, ..self }
    }
}

/* ============================================================
   Stages (order preserving)
   ============================================================ */

pub fn filter_by_range<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    range: &DateRange,
) -> Vec<&'a Appointment> {
    appointments
        .into_iter()
        .filter(|a| parse_appointment_date(&a.appointment_date).is_some_and(|t| range.contains(t)))
        .collect()
}

/// Case-insensitive substring match on the patient's full name.
/// Unresolved patients have an empty name.
pub fn filter_by_search<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    search: &str,
    lookups: &Lookups<'_>,
) -> Vec<&'a Appointment> {
    let needle = search.to_lowercase();
    appointments
        .into_iter()
        .filter(|a| needle.is_empty() || lookups.display_name(a.user_id.as_ref()).to_lowercase().contains(&needle))
        .collect()
}

pub fn filter_by_tab<'a>(appointments: impl IntoIterator<Item = &'a Appointment>, tab: Tab) -> Vec<&'a Appointment> {
    appointments
        .into_iter()
        .filter(|a| tab.matches(a.booking_status))
        .collect()
}

pub struct Filtered<'a> {
    /// After range + search; drives the tab counts.
    pub searched: Vec<&'a Appointment>,
    /// After the tab filter; drives the rows.
    pub visible: Vec<&'a Appointment>,
}

pub fn run_pipeline<'a>(
    appointments: &'a [Appointment],
    query: &AppointmentQuery,
    lookups: &Lookups<'_>,
) -> Filtered<'a> {
    let in_range = filter_by_range(appointments, &query.range);
    let searched = filter_by_search(in_range, &query.search, lookups);
    let visible = filter_by_tab(searched.iter().copied(), query.tab);
    Filtered { searched, visible }
}
