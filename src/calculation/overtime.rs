//! Weekly overtime calculation.
//!
//! Splits a Monday-first week of daily totals into regular, overtime, and
//! double-time buckets under a resolved policy. The split is conservative:
//! `regular + overtime + double_time` always equals the sum of the input
//! minutes, for every policy configuration.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Policy;

/// Minutes paid at overtime (rather than double-time) on a seventh
/// consecutive worked day.
pub const SEVENTH_DAY_OVERTIME_CAP_MINUTES: i64 = 480;

/// One day of input to the weekly overtime calculator.
///
/// Missing days must be supplied explicitly with `total_minutes = 0`; the
/// calculator never pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    /// The calendar date of the day.
    pub date: NaiveDate,
    /// Worked minutes for the day, breaks excluded.
    pub total_minutes: i64,
}

/// The per-day classification produced by the daily pass.
///
/// Records each day's split *before* the weekly pass; the weekly excess is
/// moved between buckets at the totals level only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    /// The calendar date of the day.
    pub date: NaiveDate,
    /// Regular minutes for the day.
    pub regular_minutes: i64,
    /// Daily overtime minutes for the day.
    pub overtime_minutes: i64,
    /// Double-time minutes for the day.
    pub double_time_minutes: i64,
    /// Whether the seventh-day rule reclassified this day.
    pub seventh_day: bool,
}

/// The result of splitting one week of daily totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeResult {
    /// Total regular minutes for the week.
    pub regular_minutes: i64,
    /// Total overtime minutes for the week (daily plus weekly excess).
    pub overtime_minutes: i64,
    /// Total double-time minutes for the week.
    pub double_time_minutes: i64,
    /// Per-day classification before the weekly pass.
    pub daily_breakdown: Vec<DailyBreakdown>,
}

/// Splits a week of daily totals into regular/overtime/double-time buckets.
///
/// `days` must contain exactly 7 entries, Monday first, on consecutive
/// dates; anything else fails fast with an [`EngineError`] rather than
/// being truncated or padded.
///
/// Per day, in order:
///
/// 1. Minutes above `policy.daily_double_time_minutes` (when set) become
///    double-time.
/// 2. Remaining minutes above `policy.overtime_threshold_daily` (when set)
///    become daily overtime.
/// 3. A consecutive-worked-day counter increments on any day with minutes
///    and resets on a zero day. When `policy.seventh_day_rule` is set and
///    the counter reaches 7 on a worked day, that day is reclassified from
///    scratch: minutes up to [`SEVENTH_DAY_OVERTIME_CAP_MINUTES`] are
///    overtime, the rest double-time, none regular.
///
/// After all 7 days, regular minutes above
/// `policy.overtime_threshold_weekly` (when set) move into the overtime
/// bucket. Weekly overtime stacks on top of daily overtime; no minute is
/// counted twice.
pub fn calculate_weekly_overtime(
    days: &[DayEntry],
    policy: &Policy,
) -> EngineResult<OvertimeResult> {
    if days.len() != 7 {
        return Err(EngineError::InvalidDayCount {
            expected: 7,
            actual: days.len(),
        });
    }
    if days[0].date.weekday() != Weekday::Mon {
        return Err(EngineError::InvalidWeek {
            message: format!("week must start on a Monday, got {}", days[0].date),
        });
    }
    for (offset, day) in days.iter().enumerate() {
        let expected = days[0].date + Days::new(offset as u64);
        if day.date != expected {
            return Err(EngineError::InvalidWeek {
                message: format!("expected {expected} at position {offset}, got {}", day.date),
            });
        }
        if day.total_minutes < 0 {
            return Err(EngineError::InvalidWeek {
                message: format!("negative minutes ({}) on {}", day.total_minutes, day.date),
            });
        }
    }

    let mut breakdown = Vec::with_capacity(7);
    let mut consecutive_worked = 0_i64;

    for day in days {
        let mut regular = day.total_minutes;
        let mut overtime = 0;
        let mut double_time = 0;

        if policy.daily_double_time_minutes > 0 && regular > policy.daily_double_time_minutes {
            double_time = regular - policy.daily_double_time_minutes;
            regular = policy.daily_double_time_minutes;
        }
        if policy.overtime_threshold_daily > 0 && regular > policy.overtime_threshold_daily {
            overtime = regular - policy.overtime_threshold_daily;
            regular = policy.overtime_threshold_daily;
        }

        consecutive_worked = if day.total_minutes > 0 {
            consecutive_worked + 1
        } else {
            0
        };

        let seventh_day =
            policy.seventh_day_rule && day.total_minutes > 0 && consecutive_worked >= 7;
        if seventh_day {
            // Reclassify the whole day; steps 1-2 are discarded for it.
            overtime = day.total_minutes.min(SEVENTH_DAY_OVERTIME_CAP_MINUTES);
            double_time = (day.total_minutes - SEVENTH_DAY_OVERTIME_CAP_MINUTES).max(0);
            regular = 0;
        }

        breakdown.push(DailyBreakdown {
            date: day.date,
            regular_minutes: regular,
            overtime_minutes: overtime,
            double_time_minutes: double_time,
            seventh_day,
        });
    }

    let mut regular_minutes: i64 = breakdown.iter().map(|d| d.regular_minutes).sum();
    let mut overtime_minutes: i64 = breakdown.iter().map(|d| d.overtime_minutes).sum();
    let double_time_minutes: i64 = breakdown.iter().map(|d| d.double_time_minutes).sum();

    if policy.overtime_threshold_weekly > 0 && regular_minutes > policy.overtime_threshold_weekly {
        let weekly_excess = regular_minutes - policy.overtime_threshold_weekly;
        overtime_minutes += weekly_excess;
        regular_minutes -= weekly_excess;
    }

    Ok(OvertimeResult {
        regular_minutes,
        overtime_minutes,
        double_time_minutes,
        daily_breakdown: breakdown,
    })
}
