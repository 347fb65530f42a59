//! Compliance/overtime/leave policy model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The effective compliance, overtime, and leave configuration for an
/// organization, optionally scoped to a jurisdiction.
///
/// Multiple policies may exist per org: one default with `jurisdiction =
/// None` plus zero or more jurisdiction-scoped overrides, each versioned by
/// `effective_date`. The policy resolver picks exactly one for any
/// (org, jurisdiction, instant) triple.
///
/// All durations are whole minutes; a threshold of `0` means the rule is
/// disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// The organization this policy belongs to.
    pub org_id: String,
    /// The jurisdiction this policy is scoped to, or `None` for the org
    /// default.
    pub jurisdiction: Option<String>,
    /// How many on-site days per week the org requires.
    pub required_days_per_week: u32,
    /// Minimum worked minutes for a day to count as meeting policy.
    pub minimum_minutes_per_day: i64,
    /// Daily overtime threshold in minutes (0 = no daily overtime).
    pub overtime_threshold_daily: i64,
    /// Weekly overtime threshold in minutes (0 = no weekly overtime).
    pub overtime_threshold_weekly: i64,
    /// Daily double-time threshold in minutes (0 = no double-time).
    pub daily_double_time_minutes: i64,
    /// Whether the seventh consecutive worked day gets special treatment.
    pub seventh_day_rule: bool,
    /// Whether a meal break is required.
    pub meal_break_required: bool,
    /// Worked minutes after which a meal break is due.
    pub meal_break_after_minutes: i64,
    /// Interval in minutes between required rest breaks (0 = none).
    pub rest_break_interval: i64,
    /// Annual PTO allowance in days.
    pub annual_pto_days: i64,
    /// Maximum unused PTO days that carry into the next leave year.
    pub max_carryover_days: i64,
    /// Month (1-12) the leave year starts.
    pub leave_year_start_month: u32,
    /// Day of month (1-31) the leave year starts.
    pub leave_year_start_day: u32,
    /// The date this policy version takes effect.
    pub effective_date: NaiveDate,
    /// Whether this policy version is active.
    pub is_active: bool,
}

impl Policy {
    /// The hard-coded system default used when an org has no configured
    /// policy at all: 3 required days per week, a 40-hour weekly overtime
    /// threshold, no daily or double-time thresholds, no PTO.
    pub fn system_default(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            jurisdiction: None,
            required_days_per_week: 3,
            minimum_minutes_per_day: 0,
            overtime_threshold_daily: 0,
            overtime_threshold_weekly: 2400,
            daily_double_time_minutes: 0,
            seventh_day_rule: false,
            meal_break_required: false,
            meal_break_after_minutes: 0,
            rest_break_interval: 0,
            annual_pto_days: 0,
            max_carryover_days: 0,
            leave_year_start_month: 1,
            leave_year_start_day: 1,
            effective_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            is_active: true,
        }
    }
}
