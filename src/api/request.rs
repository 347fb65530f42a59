//! Request types for the engine's HTTP surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::{DayEntry, IncidentMinutes};
use crate::models::{Policy, TimesheetPeriod};

/// Request body for `POST /days/recompute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeDayRequest {
    /// The user whose day to recompute.
    pub user_id: String,
    /// The user's organization.
    pub org_id: String,
    /// Jurisdiction context for policy resolution, if any.
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// The local calendar date to recompute.
    pub date: NaiveDate,
    /// The user's configured timezone (IANA identifier).
    pub timezone: String,
    /// Location IDs considered home/remote.
    #[serde(default)]
    pub remote_location_ids: Vec<String>,
}

/// Request body for `POST /overtime/calculate`.
///
/// A pure calculation over constructed inputs; nothing is read from any
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvertimeCalculationRequest {
    /// Exactly 7 Monday-first day entries.
    pub days: Vec<DayEntry>,
    /// The policy to split under.
    pub policy: Policy,
}

/// Request body for `POST /leave/balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveBalanceRequest {
    /// The employee to compute the balance for.
    pub user_id: String,
    /// The employee's organization.
    pub org_id: String,
    /// Jurisdiction context for policy resolution, if any.
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// The point in time the balance is evaluated at.
    pub reference_date: NaiveDate,
}

/// Request body for `POST /timesheets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesheetRequest {
    /// The user to generate the timesheet for.
    pub user_id: String,
    /// The week or month to cover.
    pub period: TimesheetPeriod,
    /// Incident/callout minutes supplied by the incident system.
    #[serde(default)]
    pub incidents: Vec<IncidentMinutes>,
    /// Location IDs considered home/remote.
    #[serde(default)]
    pub remote_location_ids: Vec<String>,
}

/// Request body for `POST /policy/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResolveRequest {
    /// The organization to resolve for.
    pub org_id: String,
    /// Jurisdiction context, if any.
    #[serde(default)]
    pub jurisdiction: Option<String>,
}
