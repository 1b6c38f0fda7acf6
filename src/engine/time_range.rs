// src/engine/time_range.rs

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/* ============================================================
   Day / week / month boundaries (naive wall-clock)
   ============================================================ */

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(NaiveDate::MAX)
}

/* ============================================================
   DateRange
   ============================================================ */

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// Inclusive range, bounds normalized to start-of-day / end-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(DateRange {
            start: start_of_day(start),
            end: end_of_day(end),
        })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        DateRange {
            start: start_of_day(date),
            end: end_of_day(date),
        }
    }

    pub fn week_of(date: NaiveDate) -> Self {
        DateRange {
            start: start_of_day(start_of_week(date)),
            end: end_of_day(end_of_week(date)),
        }
    }

    pub fn month_of(date: NaiveDate) -> Self {
        DateRange {
            start: start_of_day(start_of_month(date)),
            end: end_of_day(end_of_month(date)),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date() == self.end_date()
    }

    /// Raw instant against the day-floored bounds.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/* ============================================================
   Parsing
   ============================================================ */

/// Parse a backend appointment date. Unparseable input yields `None`
/// so the appointment silently drops out of range-filtered results.
pub fn parse_appointment_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(start_of_day(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        // wall-clock time as written by the backend
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

pub fn parse_query_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Dashboard anchor: `YYYY-MM-DD`, or `YYYY-MM` for the first of that month.
pub fn parse_anchor(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok();
    }
    parse_query_date(raw)
}

/* ============================================================
   Dashboard periods
   ============================================================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Period::Daily),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

impl Period {
    pub fn range(self, anchor: NaiveDate) -> DateRange {
        match self {
            Period::Daily => DateRange::single_day(anchor),
            Period::Weekly => DateRange::week_of(anchor),
            Period::Monthly => DateRange::month_of(anchor),
        }
    }

    /// Header text for the period, en-GB style.
    pub fn label(self, anchor: NaiveDate) -> String {
        match self {
            Period::Weekly => format!(
                "{} - {}",
                start_of_week(anchor).format("%d %b"),
                end_of_week(anchor).format("%d %b")
            ),
            Period::Monthly => anchor.format("%B %Y").to_string(),
            Period::Daily => anchor.format("%d %B %Y").to_string(),
        }
    }
}
