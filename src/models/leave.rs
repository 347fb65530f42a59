//! Leave request and allowance-override models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The category of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    /// Paid time off. The only type that counts against the PTO balance.
    Pto,
    /// Sick leave.
    Sick,
    /// Unpaid leave.
    Unpaid,
}

/// The workflow state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved. Only approved requests count against balance.
    Approved,
    /// Rejected.
    Rejected,
}

/// A single-day leave request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The requesting user.
    pub user_id: String,
    /// The user's organization.
    pub org_id: String,
    /// The day the leave is for.
    pub date: NaiveDate,
    /// The category of leave.
    pub leave_type: LeaveType,
    /// The workflow state.
    pub status: LeaveStatus,
}

/// A per-employee annual PTO allowance override.
///
/// `effective_year = None` is a permanent override; a non-null year
/// overrides only the leave year starting in that calendar year. A
/// year-specific override always beats a permanent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveAllowanceOverride {
    /// The employee the override applies to.
    pub user_id: String,
    /// The employee's organization.
    pub org_id: String,
    /// The overridden annual PTO allowance in days.
    pub annual_pto_days: i64,
    /// The leave year (by its starting calendar year) the override applies
    /// to, or `None` for all years.
    pub effective_year: Option<i32>,
}
