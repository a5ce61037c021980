//! Calendar periods and the resolver that derives them from a view kind.
//!
//! Weeks run Sunday through Saturday. That matches the task store's week
//! endpoint, so a week fetched from the store always lands inside the
//! period resolved here. Dates are plain calendar dates; the only place a
//! timezone enters is [`today`], which takes an explicit UTC offset.

use chrono::{DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DashboardError, DashboardResult};

/// Granularity of a dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl PeriodKind {
    /// Every kind, finest first.
    pub const ALL: [Self; 6] = [
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::HalfYear,
        Self::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::HalfYear => "half-year",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "half-year" | "halfyear" | "half_year" => Ok(Self::HalfYear),
            "year" => Ok(Self::Year),
            _ => Err(DashboardError::InvalidViewKind(s.to_string())),
        }
    }
}

/// Calendar coordinates that address a period at the task store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKey {
    Date(NaiveDate),
    /// Any date inside the week; the resolver uses the week's Sunday.
    Week(NaiveDate),
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    HalfYear { year: i32, half: u32 },
    Year(i32),
}

/// A concrete, inclusive date interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub kind: PeriodKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Human label, e.g. "Q1 2024" or "Week of 2024-02-11"
    pub label: String,
}

impl Period {
    /// Resolve the period of `kind` that contains `anchor`.
    pub fn resolve(kind: PeriodKind, anchor: NaiveDate) -> Self {
        let year = anchor.year();
        let (start, end, label) = match kind {
            PeriodKind::Day => (anchor, anchor, anchor.format("%Y-%m-%d").to_string()),
            PeriodKind::Week => {
                let back = u64::from(anchor.weekday().num_days_from_sunday());
                let start = anchor.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
                (start, end, format!("Week of {}", start.format("%Y-%m-%d")))
            }
            PeriodKind::Month => {
                let start = first_of(year, anchor.month());
                (start, last_of(year, anchor.month()), start.format("%B %Y").to_string())
            }
            PeriodKind::Quarter => {
                let quarter = anchor.month0() / 3 + 1;
                let first_month = (quarter - 1) * 3 + 1;
                (
                    first_of(year, first_month),
                    last_of(year, first_month + 2),
                    format!("Q{quarter} {year}"),
                )
            }
            PeriodKind::HalfYear => {
                let half = if anchor.month0() < 6 { 1 } else { 2 };
                let first_month = if half == 1 { 1 } else { 7 };
                (
                    first_of(year, first_month),
                    last_of(year, first_month + 5),
                    format!("H{half} {year}"),
                )
            }
            PeriodKind::Year => (first_of(year, 1), last_of(year, 12), year.to_string()),
        };

        Self {
            kind,
            start,
            end,
            label,
        }
    }

    /// Coordinates used to pick the store endpoint for this period.
    pub fn calendar_key(&self) -> CalendarKey {
        let year = self.start.year();
        match self.kind {
            PeriodKind::Day => CalendarKey::Date(self.start),
            PeriodKind::Week => CalendarKey::Week(self.start),
            PeriodKind::Month => CalendarKey::Month {
                year,
                month: self.start.month(),
            },
            PeriodKind::Quarter => CalendarKey::Quarter {
                year,
                quarter: self.start.month0() / 3 + 1,
            },
            PeriodKind::HalfYear => CalendarKey::HalfYear {
                year,
                half: if self.start.month0() < 6 { 1 } else { 2 },
            },
            PeriodKind::Year => CalendarKey::Year(year),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the period, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterate every date in the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// The period of the same kind `steps` units away (negative steps go back).
    ///
    /// Returns `None` only when the result would leave chrono's date range.
    pub fn shift(&self, steps: i32) -> Option<Self> {
        let months_per_step = match self.kind {
            PeriodKind::Day | PeriodKind::Week => 0,
            PeriodKind::Month => 1,
            PeriodKind::Quarter => 3,
            PeriodKind::HalfYear => 6,
            PeriodKind::Year => 12,
        };

        let anchor = if months_per_step == 0 {
            let days_per_step = if self.kind == PeriodKind::Week { 7 } else { 1 };
            let delta = Days::new(u64::from(steps.unsigned_abs()) * days_per_step);
            if steps >= 0 {
                self.start.checked_add_days(delta)?
            } else {
                self.start.checked_sub_days(delta)?
            }
        } else {
            let delta = Months::new(steps.unsigned_abs().checked_mul(months_per_step)?);
            if steps >= 0 {
                self.start.checked_add_months(delta)?
            } else {
                self.start.checked_sub_months(delta)?
            }
        };

        Some(Self::resolve(self.kind, anchor))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} to {})", self.label, self.start, self.end)
    }
}

/// Parse an anchor date in `yyyy-MM-dd` form.
pub fn parse_anchor(text: &str) -> DashboardResult<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.len() != 10 {
        return Err(DashboardError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| DashboardError::InvalidDate(text.to_string()))
}

/// The calendar date at `now` in the given UTC offset.
pub fn today(offset: FixedOffset, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

// Year comes from a valid date and month is 1..=12, so the fallbacks only
// guard chrono's outermost years.
fn first_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn last_of(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
