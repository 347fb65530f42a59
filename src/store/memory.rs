//! In-memory store implementation for tests and demos.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::EngineResult;
use crate::models::{
    DaySummary, LeaveAllowanceOverride, LeaveRequest, LeaveStatus, LeaveType, Policy, RawEvent,
};

use super::{EventStore, LeaveStore, PolicyStore, SummaryStore};

/// A single in-memory backing for all four store contracts.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: Mutex<Vec<RawEvent>>,
    policies: Mutex<Vec<Policy>>,
    overrides: Mutex<Vec<LeaveAllowanceOverride>>,
    leave: Mutex<Vec<LeaveRequest>>,
    summaries: Mutex<Vec<DaySummary>>,
}

fn unpoisoned<T>(guard: Result<T, PoisonError<T>>) -> T {
    guard.unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw event.
    pub fn add_event(&self, event: RawEvent) {
        unpoisoned(self.events.lock()).push(event);
    }

    /// Records a policy version.
    pub fn add_policy(&self, policy: Policy) {
        unpoisoned(self.policies.lock()).push(policy);
    }

    /// Records an allowance override.
    pub fn add_override(&self, ovr: LeaveAllowanceOverride) {
        unpoisoned(self.overrides.lock()).push(ovr);
    }

    /// Records a leave request.
    pub fn add_leave(&self, request: LeaveRequest) {
        unpoisoned(self.leave.lock()).push(request);
    }

    /// Returns the stored summary for (user, date), if any.
    pub fn summary(&self, user_id: &str, date: NaiveDate) -> Option<DaySummary> {
        unpoisoned(self.summaries.lock())
            .iter()
            .find(|s| s.user_id == user_id && s.date == date)
            .cloned()
    }
}

impl EventStore for InMemoryStore {
    fn list_events(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<Vec<RawEvent>> {
        let mut events: Vec<RawEvent> = unpoisoned(self.events.lock())
            .iter()
            .filter(|e| {
                e.user_id == user_id && e.server_timestamp >= from && e.server_timestamp < to
            })
            .cloned()
            .collect();
        events.sort_by_key(|e| e.server_timestamp);
        Ok(events)
    }
}

impl PolicyStore for InMemoryStore {
    fn list_active_policies(&self, org_id: &str) -> EngineResult<Vec<Policy>> {
        Ok(unpoisoned(self.policies.lock())
            .iter()
            .filter(|p| p.org_id == org_id && p.is_active)
            .cloned()
            .collect())
    }

    fn list_overrides(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> EngineResult<Vec<LeaveAllowanceOverride>> {
        Ok(unpoisoned(self.overrides.lock())
            .iter()
            .filter(|o| o.user_id == user_id && o.org_id == org_id)
            .cloned()
            .collect())
    }
}

impl LeaveStore for InMemoryStore {
    fn list_approved_leave(
        &self,
        user_id: &str,
        leave_type: Option<LeaveType>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<LeaveRequest>> {
        Ok(unpoisoned(self.leave.lock())
            .iter()
            .filter(|r| {
                r.user_id == user_id
                    && r.status == LeaveStatus::Approved
                    && leave_type.is_none_or(|t| r.leave_type == t)
                    && r.date >= from
                    && r.date <= to
            })
            .cloned()
            .collect())
    }
}

impl SummaryStore for InMemoryStore {
    fn save_day_summary(&self, summary: &DaySummary) -> EngineResult<()> {
        let mut summaries = unpoisoned(self.summaries.lock());
        match summaries
            .iter_mut()
            .find(|s| s.user_id == summary.user_id && s.date == summary.date)
        {
            Some(existing) => *existing = summary.clone(),
            None => summaries.push(summary.clone()),
        }
        Ok(())
    }

    fn list_summaries(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DaySummary>> {
        let mut summaries: Vec<DaySummary> = unpoisoned(self.summaries.lock())
            .iter()
            .filter(|s| s.user_id == user_id && s.date >= from && s.date <= to)
            .cloned()
            .collect();
        summaries.sort_by_key(|s| s.date);
        Ok(summaries)
    }
}
