// src/engine/aggregate.rs

use std::collections::HashSet;

use chrono::Datelike;
use serde::Serialize;

use crate::engine::classify::PatientKind;
use crate::engine::index::Lookups;
use crate::engine::time_range::parse_appointment_date;
use crate::models::{Appointment, BookingStatus, EntityId};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/* ============================================================
   Tab counts
   ============================================================ */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TabCounts {
    pub all: usize,
    pub upcoming: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl TabCounts {
    /// Over the range+search filtered set, before the tab filter.
    pub fn count(appointments: &[&Appointment]) -> Self {
        appointments.iter().fold(TabCounts::default(), |mut acc, a| {
            acc.all += 1;
            match a.booking_status {
                BookingStatus::Upcoming => acc.upcoming += 1,
                BookingStatus::Completed => acc.completed += 1,
                BookingStatus::Cancelled => acc.cancelled += 1,
            }
            acc
        })
    }
}

/* ============================================================
   Dashboard splits
   ============================================================ */

#[derive(Debug, Clone, Serialize)]
pub struct ChartSlice {
    pub label: &'static str,
    pub value: usize,
    /// Rounded share of the period total; absent for empty slices.
    pub percent: Option<u32>,
}

/// Completed vs cancelled. Upcoming appointments belong to neither slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSplit {
    pub completed: usize,
    pub cancelled: usize,
    pub upcoming: usize,
}

impl StatusSplit {
    pub fn count(appointments: &[&Appointment]) -> Self {
        let tabs = TabCounts::count(appointments);
        StatusSplit {
            completed: tabs.completed,
            cancelled: tabs.cancelled,
            upcoming: tabs.upcoming,
        }
    }

    pub fn slices(&self, total: usize) -> Vec<ChartSlice> {
        vec![
            ChartSlice {
                label: "Completed",
                value: self.completed,
                percent: share_percent(self.completed, total),
            },
            ChartSlice {
                label: "Cancelled",
                value: self.cancelled,
                percent: share_percent(self.cancelled, total),
            },
        ]
    }
}

pub fn share_percent(value: usize, total: usize) -> Option<u32> {
    if value == 0 || total == 0 {
        return None;
    }
    Some((value as f64 / total as f64 * 100.0).round() as u32)
}

/// Distinct `user_id`s in appearance order, patient or not. Null ids are skipped.
pub fn unique_user_ids<'a>(appointments: &[&'a Appointment]) -> Vec<&'a EntityId> {
    let mut seen = HashSet::new();
    appointments
        .iter()
        .copied()
        .filter_map(|a| a.user_id.as_ref())
        .filter(|id| seen.insert(*id))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NewExistingSplit {
    pub new: usize,
    pub existing: usize,
}

impl NewExistingSplit {
    /// Unique patients of the period, classified by all-time count.
    pub fn count(period: &[&Appointment], lookups: &Lookups<'_>) -> Self {
        let mut split = NewExistingSplit::default();
        for id in unique_user_ids(period) {
            if lookups.patient(id).is_none() {
                continue;
            }
            match PatientKind::classify(lookups.patient_count(id)) {
                Some(PatientKind::New) => split.new += 1,
                Some(PatientKind::Existing) => split.existing += 1,
                None => {}
            }
        }
        split
    }

    pub fn slices(&self) -> Vec<ChartSlice> {
        vec![
            ChartSlice {
                label: "New Patients",
                value: self.new,
                percent: share_percent(self.new, self.new + self.existing),
            },
            ChartSlice {
                label: "Existing Patients",
                value: self.existing,
                percent: share_percent(self.existing, self.new + self.existing),
            },
        ]
    }
}

/* ============================================================
   Monthly series
   ============================================================ */

/// Distinct patients per month of year. `year = None` folds every year
/// onto the same twelve buckets.
pub fn monthly_unique_patients(
    appointments: &[Appointment],
    lookups: &Lookups<'_>,
    year: Option<i32>,
) -> [usize; 12] {
    let mut buckets: [HashSet<&EntityId>; 12] = Default::default();
    for appt in appointments {
        let Some(at) = parse_appointment_date(&appt.appointment_date) else {
            continue;
        };
        if year.is_some_and(|y| at.year() != y) {
            continue;
        }
        let Some(id) = appt.user_id.as_ref() else {
            continue;
        };
        if lookups.patient(id).is_none() {
            continue;
        }
        buckets[at.month0() as usize].insert(id);
    }
    buckets.map(|set| set.len())
}

/// Y axis ceiling for the monthly chart: 10, or the next 1/2/5 x 10^n.
pub fn suggested_axis_max(series: &[usize]) -> usize {
    let max = series.iter().copied().max().unwrap_or(0).max(1);
    if max <= 10 {
        return 10;
    }
    let pow = 10usize.pow(max.ilog10());
    let factor = max.div_ceil(pow);
    let step = match factor {
        0..=2 => 2,
        3..=5 => 5,
        _ => 10,
    };
    pow * step
}

pub fn axis_step(axis_max: usize) -> usize {
    axis_max.div_ceil(5).max(1)
}
