//! Payroll timesheet models.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The range a timesheet covers: one ISO week or one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimesheetPeriod {
    /// A single ISO week identified by its Monday.
    Week {
        /// The Monday the week starts on.
        monday: NaiveDate,
    },
    /// A calendar month.
    Month {
        /// The calendar year.
        year: i32,
        /// The month, 1-12.
        month: u32,
    },
}

impl TimesheetPeriod {
    /// Returns the inclusive `[start, end]` date bounds of the period.
    ///
    /// Fails fast with [`EngineError::InvalidPeriod`] when the week anchor
    /// is not a Monday or the month is outside 1-12.
    pub fn bounds(&self) -> EngineResult<(NaiveDate, NaiveDate)> {
        match *self {
            TimesheetPeriod::Week { monday } => {
                if monday.weekday() != Weekday::Mon {
                    return Err(EngineError::InvalidPeriod {
                        message: format!("{monday} is not a Monday"),
                    });
                }
                Ok((monday, monday + Days::new(6)))
            }
            TimesheetPeriod::Month { year, month } => {
                let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
                    EngineError::InvalidPeriod {
                        message: format!("invalid month {year}-{month:02}"),
                    }
                })?;
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                };
                let end = next
                    .and_then(|d| d.pred_opt())
                    .ok_or_else(|| EngineError::InvalidPeriod {
                        message: format!("invalid month {year}-{month:02}"),
                    })?;
                Ok((start, end))
            }
        }
    }
}

/// One ISO week of a timesheet, clipped to the requested period at month
/// boundaries.
///
/// The regular/overtime/double-time split here is the single source of
/// truth for classification; period totals are a pure additive rollup of
/// these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBreakdown {
    /// First date of the (clipped) week inside the period.
    pub start: NaiveDate,
    /// Last date of the (clipped) week inside the period.
    pub end: NaiveDate,
    /// Base worked minutes from day summaries inside the clip.
    pub worked_minutes: i64,
    /// Incident/callout minutes credited to this week.
    pub incident_minutes: i64,
    /// Regular minutes after the payroll split.
    pub regular_minutes: i64,
    /// Overtime minutes after the payroll split.
    pub overtime_minutes: i64,
    /// Double-time minutes after the payroll split.
    pub double_time_minutes: i64,
    /// Minutes worked at on-site locations.
    pub on_site_minutes: i64,
    /// Minutes worked at home/remote locations.
    pub remote_minutes: i64,
    /// Approved leave days falling inside the clip.
    pub leave_days: i64,
}

/// Additive rollup of a timesheet's weekly rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimesheetTotals {
    /// Total worked minutes, incidents included.
    pub total_minutes: i64,
    /// Total incident/callout minutes.
    pub incident_minutes: i64,
    /// Total regular minutes.
    pub regular_minutes: i64,
    /// Total overtime minutes.
    pub overtime_minutes: i64,
    /// Total double-time minutes.
    pub double_time_minutes: i64,
    /// Total on-site minutes.
    pub on_site_minutes: i64,
    /// Total remote minutes.
    pub remote_minutes: i64,
    /// Total approved leave days.
    pub leave_days: i64,
}

/// A payroll-ready timesheet for one user over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timesheet {
    /// The user the timesheet belongs to.
    pub user_id: String,
    /// The requested period.
    pub period: TimesheetPeriod,
    /// Per-week rows, in chronological order.
    pub weeks: Vec<WeekBreakdown>,
    /// Additive rollup of the weekly rows.
    pub totals: TimesheetTotals,
}
