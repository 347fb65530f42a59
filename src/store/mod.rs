//! Read/write contracts for the external stores the engine relies on.
//!
//! The engine owns no persistence: the event ledger, policy store, leave
//! store, and day-summary store are external collaborators specified only
//! at their interface. The in-memory implementations here back the tests
//! and the demo API state.

mod memory;

use chrono::{DateTime, NaiveDate, Utc};

pub use memory::InMemoryStore;

use crate::error::EngineResult;
use crate::models::{DaySummary, LeaveAllowanceOverride, LeaveRequest, LeaveType, Policy, RawEvent};

/// Read access to the append-only raw event ledger.
pub trait EventStore: Send + Sync {
    /// Lists a user's events with `from <= server_timestamp < to`, ordered
    /// ascending by server timestamp.
    fn list_events(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<Vec<RawEvent>>;
}

/// Read access to configured policies and allowance overrides.
pub trait PolicyStore: Send + Sync {
    /// Lists an org's active policy versions, all jurisdictions included.
    fn list_active_policies(&self, org_id: &str) -> EngineResult<Vec<Policy>>;

    /// Lists an employee's leave allowance overrides.
    fn list_overrides(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> EngineResult<Vec<LeaveAllowanceOverride>>;
}

/// Read access to approved leave.
pub trait LeaveStore: Send + Sync {
    /// Lists a user's approved leave requests with dates in the inclusive
    /// `[from, to]` range, optionally filtered by type.
    fn list_approved_leave(
        &self,
        user_id: &str,
        leave_type: Option<LeaveType>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<LeaveRequest>>;

    /// Counts a user's approved leave days in the inclusive `[from, to]`
    /// range, optionally filtered by type.
    fn count_approved_leave(
        &self,
        user_id: &str,
        leave_type: Option<LeaveType>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<i64> {
        Ok(self.list_approved_leave(user_id, leave_type, from, to)?.len() as i64)
    }
}

/// Read/write access to canonical day summaries.
pub trait SummaryStore: Send + Sync {
    /// Idempotently overwrites the summary keyed on (user, date).
    fn save_day_summary(&self, summary: &DaySummary) -> EngineResult<()>;

    /// Lists a user's summaries with dates in the inclusive `[from, to]`
    /// range, ordered by date.
    fn list_summaries(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DaySummary>>;
}
