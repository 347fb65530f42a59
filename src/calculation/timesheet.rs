//! Payroll timesheet aggregation.
//!
//! Composes day summaries, the weekly overtime split, incident-driven
//! compensatory minutes, and approved leave into weekly and monthly
//! timesheets. Payroll uses its own flat 40-hour weekly threshold,
//! independent of the org's compliance policy: compliance policy governs
//! alerting and dashboards, payroll policy governs pay.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{DaySummary, Policy, Timesheet, TimesheetPeriod, TimesheetTotals, WeekBreakdown};

use super::overtime::{DayEntry, calculate_weekly_overtime};

/// The flat payroll overtime threshold: 40 hours per week.
pub const PAYROLL_WEEKLY_THRESHOLD_MINUTES: i64 = 2400;

/// Incident/callout minutes credited to a specific day, supplied by the
/// incident system. Added to the day's total before the weekly split, so a
/// high-priority callout can push a week over threshold even when base
/// clock time alone would not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentMinutes {
    /// The day the incident minutes belong to.
    pub date: NaiveDate,
    /// Minutes to credit.
    pub minutes: i64,
}

/// The policy payroll splits weeks under: a flat weekly threshold with no
/// daily or double-time rules. Deliberately distinct from the org's
/// configured compliance policy.
pub fn payroll_policy(org_id: &str) -> Policy {
    Policy {
        overtime_threshold_weekly: PAYROLL_WEEKLY_THRESHOLD_MINUTES,
        ..Policy::system_default(org_id)
    }
}

/// Generates a payroll timesheet for one user over one period.
///
/// The period is partitioned into ISO weeks, clipped to the period's
/// bounds at month boundaries. Each week gets a regular/overtime split via
/// [`calculate_weekly_overtime`] under [`payroll_policy`], with incident
/// minutes added to their day before the split. On-site vs remote minutes
/// (from each day's primary location) and approved leave days are tracked
/// per week for reporting; incident minutes take no part in the site
/// split.
///
/// Period totals are a pure additive rollup of the weekly rows: the weekly
/// split is the single source of truth for classification, and monthly
/// totals are never re-split by a monthly threshold.
pub fn generate_timesheet(
    user_id: &str,
    period: TimesheetPeriod,
    summaries: &[DaySummary],
    incidents: &[IncidentMinutes],
    leave_dates: &[NaiveDate],
    remote_locations: &HashSet<String>,
) -> EngineResult<Timesheet> {
    let (period_start, period_end) = period.bounds()?;

    let by_date: HashMap<NaiveDate, &DaySummary> = summaries
        .iter()
        .filter(|s| s.user_id == user_id)
        .map(|s| (s.date, s))
        .collect();
    let mut incident_by_date: HashMap<NaiveDate, i64> = HashMap::new();
    for incident in incidents {
        *incident_by_date.entry(incident.date).or_default() += incident.minutes;
    }

    let split_policy = payroll_policy("payroll");
    let mut weeks = Vec::new();
    let mut totals = TimesheetTotals::default();

    let mut week_start =
        period_start - Days::new(period_start.weekday().num_days_from_monday() as u64);
    while week_start <= period_end {
        let clip_start = week_start.max(period_start);
        let clip_end = (week_start + Days::new(6)).min(period_end);

        let mut worked_minutes = 0;
        let mut incident_minutes = 0;
        let mut on_site_minutes = 0;
        let mut remote_minutes = 0;
        let mut entries = Vec::with_capacity(7);

        for offset in 0..7 {
            let date = week_start + Days::new(offset);
            let in_clip = date >= clip_start && date <= clip_end;
            let mut minutes = 0;
            if in_clip {
                if let Some(summary) = by_date.get(&date) {
                    minutes += summary.total_minutes;
                    worked_minutes += summary.total_minutes;
                    let remote = summary
                        .location_id
                        .as_ref()
                        .is_some_and(|loc| remote_locations.contains(loc));
                    if remote {
                        remote_minutes += summary.total_minutes;
                    } else {
                        on_site_minutes += summary.total_minutes;
                    }
                }
                if let Some(&extra) = incident_by_date.get(&date) {
                    minutes += extra;
                    incident_minutes += extra;
                }
            }
            entries.push(DayEntry {
                date,
                total_minutes: minutes,
            });
        }

        let split = calculate_weekly_overtime(&entries, &split_policy)?;
        let leave_days = leave_dates
            .iter()
            .filter(|d| **d >= clip_start && **d <= clip_end)
            .count() as i64;

        let week = WeekBreakdown {
            start: clip_start,
            end: clip_end,
            worked_minutes,
            incident_minutes,
            regular_minutes: split.regular_minutes,
            overtime_minutes: split.overtime_minutes,
            double_time_minutes: split.double_time_minutes,
            on_site_minutes,
            remote_minutes,
            leave_days,
        };

        totals.total_minutes += week.worked_minutes + week.incident_minutes;
        totals.incident_minutes += week.incident_minutes;
        totals.regular_minutes += week.regular_minutes;
        totals.overtime_minutes += week.overtime_minutes;
        totals.double_time_minutes += week.double_time_minutes;
        totals.on_site_minutes += week.on_site_minutes;
        totals.remote_minutes += week.remote_minutes;
        totals.leave_days += week.leave_days;
        weeks.push(week);

        week_start = week_start + Days::new(7);
    }

    Ok(Timesheet {
        user_id: user_id.to_string(),
        period,
        weeks,
        totals,
    })
}
