//! Leave-year resolution and PTO balance calculation.
//!
//! A leave year is a rolling 12-month window anchored to an org-configured
//! month/day, not necessarily the calendar year. Balances are computed for
//! the window containing a reference date, with capped carryover from the
//! immediately preceding window and per-employee allowance overrides.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveAllowanceOverride, LeaveRequest, LeaveStatus, LeaveType, Policy};

/// An inclusive leave-year window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveYear {
    /// The anchor date the window starts on.
    pub start: NaiveDate,
    /// The last date of the window (the day before the next anchor).
    pub end: NaiveDate,
}

impl LeaveYear {
    /// Whether a date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A point-in-time PTO balance. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtoBalance {
    /// The annual allowance resolved for the current leave year, in days.
    pub annual_allowance: i64,
    /// Unused days carried over from the prior leave year, capped.
    pub carryover: i64,
    /// Approved PTO days taken inside the current leave year.
    pub taken: i64,
    /// `annual_allowance + carryover - taken`. May be negative when the
    /// employee is over-allocated; reported as-is.
    pub remaining: i64,
    /// First day of the current leave year.
    pub leave_year_start: NaiveDate,
    /// Last day of the current leave year.
    pub leave_year_end: NaiveDate,
    /// Whether a per-employee override supplied the allowance.
    pub override_applied: bool,
}

/// Resolves the anchor date for a calendar year, clamping anchor days that
/// do not exist in that year (Feb 29 off-leap, Feb 30 misconfiguration) to
/// the month's last day.
fn anchor_date(year: i32, month: u32, day: u32) -> EngineResult<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(EngineError::InvalidLeaveYearAnchor { month, day });
    }
    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        return Ok(date);
    }
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month_first
        .and_then(|d| d.pred_opt())
        .ok_or(EngineError::InvalidLeaveYearAnchor { month, day })
}

/// Computes the leave-year window containing `reference`.
///
/// When `reference` falls on or after this calendar year's anchor, the
/// window runs from this year's anchor to the day before next year's;
/// otherwise it runs from last year's anchor to the day before this
/// year's. Anchors outside month 1-12 / day 1-31 fail fast.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use ledger_engine::calculation::leave_year_window;
///
/// // April-anchored leave year, referenced in June.
/// let reference = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
/// let window = leave_year_window(reference, 4, 1).unwrap();
/// assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
/// assert_eq!(window.end, NaiveDate::from_ymd_opt(2027, 3, 31).unwrap());
/// ```
pub fn leave_year_window(
    reference: NaiveDate,
    start_month: u32,
    start_day: u32,
) -> EngineResult<LeaveYear> {
    let this_year_anchor = anchor_date(reference.year(), start_month, start_day)?;
    let (start, next_anchor) = if reference >= this_year_anchor {
        (
            this_year_anchor,
            anchor_date(reference.year() + 1, start_month, start_day)?,
        )
    } else {
        (
            anchor_date(reference.year() - 1, start_month, start_day)?,
            this_year_anchor,
        )
    };
    let end = next_anchor
        .pred_opt()
        .ok_or(EngineError::InvalidLeaveYearAnchor {
            month: start_month,
            day: start_day,
        })?;
    Ok(LeaveYear { start, end })
}

/// Resolves an employee's annual allowance for the leave year starting in
/// `window_start_year`.
///
/// Precedence: a year-specific override beats a permanent override beats
/// the org default. At most one year-specific override should exist per
/// (user, year); if duplicates do exist the most generous one is used, so
/// the result never depends on input order.
///
/// Returns the allowance in days and whether an override supplied it.
pub fn resolve_allowance(
    overrides: &[LeaveAllowanceOverride],
    policy: &Policy,
    window_start_year: i32,
) -> (i64, bool) {
    if let Some(year_specific) = overrides
        .iter()
        .filter(|o| o.effective_year == Some(window_start_year))
        .max_by_key(|o| o.annual_pto_days)
    {
        return (year_specific.annual_pto_days, true);
    }
    if let Some(permanent) = overrides
        .iter()
        .filter(|o| o.effective_year.is_none())
        .max_by_key(|o| o.annual_pto_days)
    {
        return (permanent.annual_pto_days, true);
    }
    (policy.annual_pto_days, false)
}

fn approved_pto_days_in(requests: &[LeaveRequest], window: &LeaveYear) -> i64 {
    requests
        .iter()
        .filter(|r| {
            r.status == LeaveStatus::Approved
                && r.leave_type == LeaveType::Pto
                && window.contains(r.date)
        })
        .count() as i64
}

/// Computes the point-in-time PTO balance at `reference`.
///
/// `policy` must already be resolved for the employee's org/jurisdiction;
/// `overrides` and `requests` are the employee's full override and leave
/// request sets (requests outside the relevant windows are ignored, and
/// only approved PTO counts against balance).
///
/// Carryover is the prior leave year's unused allowance capped at
/// `policy.max_carryover_days`, or zero when carryover is disabled.
pub fn calculate_pto_balance(
    policy: &Policy,
    overrides: &[LeaveAllowanceOverride],
    requests: &[LeaveRequest],
    reference: NaiveDate,
) -> EngineResult<PtoBalance> {
    let window = leave_year_window(
        reference,
        policy.leave_year_start_month,
        policy.leave_year_start_day,
    )?;

    let (annual_allowance, override_applied) =
        resolve_allowance(overrides, policy, window.start.year());
    let taken = approved_pto_days_in(requests, &window);

    let carryover = if policy.max_carryover_days > 0 {
        let prior_reference =
            window
                .start
                .pred_opt()
                .ok_or(EngineError::InvalidLeaveYearAnchor {
                    month: policy.leave_year_start_month,
                    day: policy.leave_year_start_day,
                })?;
        let prior = leave_year_window(
            prior_reference,
            policy.leave_year_start_month,
            policy.leave_year_start_day,
        )?;
        let (prior_allowance, _) = resolve_allowance(overrides, policy, prior.start.year());
        let prior_taken = approved_pto_days_in(requests, &prior);
        let prior_unused = (prior_allowance - prior_taken).max(0);
        prior_unused.min(policy.max_carryover_days)
    } else {
        0
    };

    Ok(PtoBalance {
        annual_allowance,
        carryover,
        taken,
        remaining: annual_allowance + carryover - taken,
        leave_year_start: window.start,
        leave_year_end: window.end,
        override_applied,
    })
}
