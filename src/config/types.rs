//! Jurisdiction rule bundle types.
//!
//! These are the strongly-typed structures deserialized from the versioned
//! YAML rule table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Policy;

/// The rule bundle for one jurisdiction.
///
/// All durations are whole minutes; `0` disables the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionRules {
    /// Human-readable region name.
    pub name: String,
    /// Daily overtime threshold in minutes.
    pub overtime_threshold_daily: i64,
    /// Weekly overtime threshold in minutes.
    pub overtime_threshold_weekly: i64,
    /// Daily double-time threshold in minutes.
    pub daily_double_time_minutes: i64,
    /// Whether the seventh consecutive worked day gets special treatment.
    pub seventh_day_rule: bool,
    /// Whether a meal break is required.
    pub meal_break_required: bool,
    /// Worked minutes after which a meal break is due.
    pub meal_break_after_minutes: i64,
    /// Interval in minutes between required rest breaks.
    pub rest_break_interval: i64,
    /// Predictive-scheduling notice requirement in hours (0 = none).
    pub predictive_notice_hours: i64,
}

/// The full rule table: a version marker plus bundles keyed by region code.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionConfig {
    /// The data version of the table (e.g. "2026-01").
    pub version: String,
    /// Rule bundles keyed by jurisdiction code.
    pub jurisdictions: HashMap<String, JurisdictionRules>,
}

/// Overlays a jurisdiction bundle onto a resolved policy.
///
/// The bundle's overtime, double-time, seventh-day, and break fields
/// replace the policy's wholesale; org-specific fields (PTO, leave-year
/// anchor, daily minimum) are untouched.
pub fn apply_jurisdiction_rules(policy: &Policy, rules: &JurisdictionRules) -> Policy {
    Policy {
        overtime_threshold_daily: rules.overtime_threshold_daily,
        overtime_threshold_weekly: rules.overtime_threshold_weekly,
        daily_double_time_minutes: rules.daily_double_time_minutes,
        seventh_day_rule: rules.seventh_day_rule,
        meal_break_required: rules.meal_break_required,
        meal_break_after_minutes: rules.meal_break_after_minutes,
        rest_break_interval: rules.rest_break_interval,
        ..policy.clone()
    }
}
