//! Appointment filtering, classification and aggregation.
//!
//! Pure functions over lists fetched from the backend. Nothing here
//! performs I/O or keeps state between calls.

pub mod aggregate;
pub mod classify;
pub mod filter;
pub mod index;
pub mod paginate;
pub mod time_range;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Appointment, Service, User};

use aggregate::{
    ChartSlice, MONTH_LABELS, NewExistingSplit, StatusSplit, TabCounts, axis_step,
    monthly_unique_patients, suggested_axis_max, unique_user_ids,
};
use classify::{AppointmentRow, shape_rows};
use filter::{AppointmentQuery, Tab, filter_by_range, run_pipeline};
use index::Lookups;
use paginate::{PageError, PageInfo, Pagination};
use time_range::{DateRange, Period};

/* ============================================================
   Appointments page
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct AppointmentView {
    pub range: DateRange,
    pub label: String,
    pub search: String,
    pub tab: Tab,
    pub counts: TabCounts,
    pub rows: Vec<AppointmentRow>,
    pub page: PageInfo,
}

impl AppointmentView {
    /// `appointments` is the full list; classification always counts over it.
    pub fn build(
        appointments: &[Appointment],
        users: &[User],
        services: &[Service],
        query: &AppointmentQuery,
        pagination: Pagination,
        today: NaiveDate,
    ) -> Result<Self, PageError> {
        let lookups = Lookups::build(appointments, users, services);
        let filtered = run_pipeline(appointments, query, &lookups);
        let counts = TabCounts::count(&filtered.searched);

        let page = pagination.check(query.page, filtered.visible.len())?;
        let visible = pagination.slice(&filtered.visible, query.page);

        tracing::debug!(
            total = appointments.len(),
            in_view = filtered.searched.len(),
            visible = filtered.visible.len(),
            page = query.page,
            "appointment view computed"
        );

        Ok(AppointmentView {
            range: query.range,
            label: range_label(&query.range, today),
            search: query.search.clone(),
            tab: query.tab,
            counts,
            rows: shape_rows(visible, &lookups),
            page,
        })
    }
}

/// "Today" / "Tomorrow" / a single date / "start - end".
pub fn range_label(range: &DateRange, today: NaiveDate) -> String {
    if !range.is_single_day() {
        return format!(
            "{} - {}",
            range.start_date().format("%a %b %d %Y"),
            range.end_date().format("%a %b %d %Y")
        );
    }
    let day = range.start_date();
    if day == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(day) {
        "Tomorrow".to_string()
    } else {
        day.format("%a %b %d %Y").to_string()
    }
}

/* ============================================================
   Dashboard
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct SummaryCards {
    pub total_patients: usize,
    pub appointments: usize,
}

#[derive(Debug, Serialize)]
pub struct MonthlySeries {
    pub labels: [&'static str; 12],
    pub data: [usize; 12],
    pub year: Option<i32>,
    pub suggested_max: usize,
    pub step_size: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub mode: Period,
    pub anchor: NaiveDate,
    pub period: DateRange,
    pub label: String,
    pub cards: SummaryCards,
    pub status: StatusSplit,
    pub status_chart: Vec<ChartSlice>,
    pub patients: NewExistingSplit,
    pub patients_chart: Vec<ChartSlice>,
    pub monthly: MonthlySeries,
}

impl DashboardView {
    pub fn build(
        appointments: &[Appointment],
        users: &[User],
        mode: Period,
        anchor: NaiveDate,
        year: Option<i32>,
    ) -> Self {
        let lookups = Lookups::build(appointments, users, &[]);
        let period = mode.range(anchor);
        let in_period = filter_by_range(appointments, &period);

        let status = StatusSplit::count(&in_period);
        let patients = NewExistingSplit::count(&in_period, &lookups);
        let data = monthly_unique_patients(appointments, &lookups, year);
        let suggested_max = suggested_axis_max(&data);

        tracing::debug!(
            total = appointments.len(),
            in_period = in_period.len(),
            ?mode,
            %anchor,
            "dashboard computed"
        );

        DashboardView {
            mode,
            anchor,
            period,
            label: mode.label(anchor),
            cards: SummaryCards {
                total_patients: unique_user_ids(&in_period).len(),
                appointments: in_period.len(),
            },
            status_chart: status.slices(in_period.len()),
            status,
            patients_chart: patients.slices(),
            patients,
            monthly: MonthlySeries {
                labels: MONTH_LABELS,
                data,
                year,
                suggested_max,
                step_size: axis_step(suggested_max),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::{PatientKind, TransferLetter};
    use crate::engine::index::fixtures::*;
    use crate::models::BookingStatus::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_day_repeat_patient_scenario() {
        let users = vec![patient("A", "Amina", "Otieno")];
        let appts = vec![
            appt("a1", "A", "2025-09-22", Upcoming),
            appt("a2", "A", "2025-09-22", Completed),
        ];
        let day = d(2025, 9, 22);
        let query = AppointmentQuery::new(DateRange::new(day, day).unwrap());

        let view = AppointmentView::build(&appts, &users, &[], &query, Pagination::new(5), day).unwrap();
        assert_eq!(
            view.counts,
            TabCounts {
                all: 2,
                upcoming: 1,
                completed: 1,
                cancelled: 0
            }
        );
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows.iter().all(|r| r.patient_type == Some(PatientKind::Existing)));
        assert!(view.rows.iter().all(|r| r.transfer_letter == TransferLetter::NotRequired));
        assert_eq!(view.label, "Today");
    }

    #[test]
    fn switching_tabs_keeps_counts() {
        let users = vec![patient("A", "Amina", "Otieno"), patient("B", "Brian", "Kamau")];
        let appts = vec![
            appt("a1", "A", "2025-09-22", Upcoming),
            appt("a2", "B", "2025-09-22", Completed),
            appt("a3", "B", "2025-09-22", Cancelled),
        ];
        let day = d(2025, 9, 22);
        let base = AppointmentQuery::new(DateRange::single_day(day));

        let all = AppointmentView::build(&appts, &users, &[], &base, Pagination::default(), day).unwrap();
        let done = AppointmentView::build(
            &appts,
            &users,
            &[],
            &base.clone().with_tab(Tab::Completed),
            Pagination::default(),
            day,
        )
        .unwrap();

        assert_eq!(all.counts, done.counts);
        assert_eq!(all.rows.len(), 3);
        assert_eq!(done.rows.len(), 1);
        assert_eq!(done.rows[0].appointment_id.key(), "a2");
    }

    #[test]
    fn twelve_rows_paginate_into_three_pages() {
        let users = vec![patient("A", "Amina", "Otieno")];
        let appts: Vec<_> = (0..12)
            .map(|i| appt(&format!("a{i}"), "A", "2025-09-22", Upcoming))
            .collect();
        let day = d(2025, 9, 22);
        let query = AppointmentQuery::new(DateRange::single_day(day));

        let p1 = AppointmentView::build(&appts, &users, &[], &query, Pagination::new(5), day).unwrap();
        assert_eq!(p1.page.total_pages, 3);
        assert_eq!(p1.rows.len(), 5);
        assert_eq!(p1.rows[0].appointment_id.key(), "a0");

        let p3 = AppointmentView::build(&appts, &users, &[], &query.clone().with_page(3), Pagination::new(5), day)
            .unwrap();
        assert_eq!(p3.rows.len(), 2);
        assert_eq!(p3.rows[1].appointment_id.key(), "a11");

        let p4 = AppointmentView::build(&appts, &users, &[], &query.with_page(4), Pagination::new(5), day);
        assert!(matches!(p4, Err(PageError::OutOfRange { page: 4, total_pages: 3 })));
    }

    #[test]
    fn empty_range_gives_empty_view() {
        let appts = vec![appt("a1", "A", "2025-09-21", Upcoming)];
        let day = d(2025, 9, 22);
        let query = AppointmentQuery::new(DateRange::single_day(day));

        let view = AppointmentView::build(&appts, &[], &[], &query, Pagination::new(5), day).unwrap();
        assert_eq!(view.counts, TabCounts::default());
        assert_eq!(view.page.total_pages, 1);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn labels_for_single_days_and_ranges() {
        let today = d(2025, 9, 22);
        assert_eq!(range_label(&DateRange::single_day(today), today), "Today");
        assert_eq!(range_label(&DateRange::single_day(d(2025, 9, 23)), today), "Tomorrow");
        assert_eq!(range_label(&DateRange::single_day(d(2025, 9, 24)), today), "Wed Sep 24 2025");
        assert_eq!(
            range_label(&DateRange::new(d(2025, 9, 22), d(2025, 9, 24)).unwrap(), today),
            "Mon Sep 22 2025 - Wed Sep 24 2025"
        );
    }

    #[test]
    fn dashboard_week_view() {
        let users = vec![
            patient("A", "Amina", "Otieno"),
            patient("B", "Brian", "Kamau"),
            user("D", "Grace", "Wanjiru", "clinician"),
        ];
        let appts = vec![
            appt("a0", "A", "2025-06-10", Completed),
            appt("a1", "A", "2025-09-22", Completed),
            appt("b1", "B", "2025-09-24", Cancelled),
            appt("b2", "B", "2025-09-28", Upcoming),
            appt("d1", "D", "2025-09-25", Completed),
            appt("x1", "A", "2025-09-29", Completed),
        ];

        let view = DashboardView::build(&appts, &users, Period::Weekly, d(2025, 9, 24), None);
        assert_eq!(view.label, "22 Sep - 28 Sep");
        assert_eq!(view.cards.appointments, 4);
        assert_eq!(view.cards.total_patients, 3);
        assert_eq!(view.status, StatusSplit { completed: 2, cancelled: 1, upcoming: 1 });
        assert_eq!(view.status_chart[0].percent, Some(50));
        // A has three appointments overall, B two
        assert_eq!(view.patients, NewExistingSplit { new: 0, existing: 2 });
        assert_eq!(view.monthly.data[5], 1);
        assert_eq!(view.monthly.data[8], 2);
        assert_eq!(view.monthly.suggested_max, 10);
        assert_eq!(view.monthly.step_size, 2);
    }
}
