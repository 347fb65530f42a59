//! Store-composed engine operations.
//!
//! [`TimeLedger`] wires the pure calculators to the external stores. It
//! performs exactly one read (plus, for day recomputation, one idempotent
//! upsert) per operation and never retries: recomputation fully replaces
//! the summary from the authoritative event set, so the calling layer can
//! blindly retry on I/O failure.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::calculation::{
    DayScanInput, IncidentMinutes, PtoBalance, calculate_pto_balance, day_bounds,
    generate_timesheet, leave_year_window, resolve_effective_policy, summarize_day,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{DaySummary, LeaveType, Policy, Timesheet, TimesheetPeriod};
use crate::store::{EventStore, LeaveStore, PolicyStore, SummaryStore};

/// The engine facade over the external stores.
pub struct TimeLedger {
    events: Arc<dyn EventStore>,
    policies: Arc<dyn PolicyStore>,
    leave: Arc<dyn LeaveStore>,
    summaries: Arc<dyn SummaryStore>,
    // Recomputation is linearized per (user, date): concurrent triggers for
    // the same day must not interleave, or a stale event set could win.
    recompute_locks: Mutex<HashMap<(String, NaiveDate), Arc<Mutex<()>>>>,
}

impl TimeLedger {
    /// Creates an engine over the given stores.
    pub fn new(
        events: Arc<dyn EventStore>,
        policies: Arc<dyn PolicyStore>,
        leave: Arc<dyn LeaveStore>,
        summaries: Arc<dyn SummaryStore>,
    ) -> Self {
        Self {
            events,
            policies,
            leave,
            summaries,
            recompute_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Parses a timezone identifier.
    pub fn parse_timezone(name: &str) -> EngineResult<Tz> {
        name.parse().map_err(|_| EngineError::UnknownTimezone {
            name: name.to_string(),
        })
    }

    /// Resolves the effective policy for an org from the policy store.
    ///
    /// Never fails to produce a policy: the resolver's hard-coded terminal
    /// fallback applies when the org has nothing configured.
    pub fn effective_policy(
        &self,
        org_id: &str,
        jurisdiction: Option<&str>,
    ) -> EngineResult<Policy> {
        let policies = self.policies.list_active_policies(org_id)?;
        Ok(resolve_effective_policy(org_id, jurisdiction, &policies))
    }

    fn day_lock(&self, user_id: &str, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self
            .recompute_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry((user_id.to_string(), date))
            .or_default()
            .clone()
    }

    /// Recomputes the canonical [`DaySummary`] for one (user, date) from
    /// the authoritative raw event set and upserts it.
    ///
    /// Safe to call repeatedly: each call fully replaces the summary, so
    /// there is no drift from double-counting. Calls for the same
    /// (user, date) are serialized; different users never contend.
    pub fn recompute_day(
        &self,
        user_id: &str,
        org_id: &str,
        jurisdiction: Option<&str>,
        date: NaiveDate,
        timezone: &str,
        remote_locations: &HashSet<String>,
    ) -> EngineResult<DaySummary> {
        let tz: Tz = Self::parse_timezone(timezone)?;
        let lock = self.day_lock(user_id, date);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let (from, to) = day_bounds(date, tz);
        let events = self.events.list_events(user_id, from, to)?;
        let policy = self.effective_policy(org_id, jurisdiction)?;

        let summary = summarize_day(&DayScanInput {
            user_id,
            date,
            timezone: tz,
            events: &events,
            evaluated_at: Utc::now(),
            policy: &policy,
            remote_locations,
        });

        self.summaries.save_day_summary(&summary)?;
        info!(
            user_id,
            %date,
            total_minutes = summary.total_minutes,
            meets_policy = summary.meets_policy,
            "day summary recomputed"
        );
        Ok(summary)
    }

    /// Computes the point-in-time PTO balance for an employee.
    pub fn pto_balance(
        &self,
        user_id: &str,
        org_id: &str,
        jurisdiction: Option<&str>,
        reference: NaiveDate,
    ) -> EngineResult<PtoBalance> {
        let policy = self.effective_policy(org_id, jurisdiction)?;
        let overrides = self.policies.list_overrides(user_id, org_id)?;

        // One read covering both the current and the prior leave year.
        let current = leave_year_window(
            reference,
            policy.leave_year_start_month,
            policy.leave_year_start_day,
        )?;
        let prior_start = current
            .start
            .pred_opt()
            .map(|d| {
                leave_year_window(
                    d,
                    policy.leave_year_start_month,
                    policy.leave_year_start_day,
                )
            })
            .transpose()?
            .map(|w| w.start)
            .unwrap_or(current.start);
        let requests = self.leave.list_approved_leave(
            user_id,
            Some(LeaveType::Pto),
            prior_start,
            current.end,
        )?;

        calculate_pto_balance(&policy, &overrides, &requests, reference)
    }

    /// Generates a payroll timesheet for one user over one period.
    ///
    /// Incident/callout minutes come from the incident system and are
    /// passed through; leave days come from the leave store.
    pub fn timesheet(
        &self,
        user_id: &str,
        period: TimesheetPeriod,
        incidents: &[IncidentMinutes],
        remote_locations: &HashSet<String>,
    ) -> EngineResult<Timesheet> {
        let (from, to) = period.bounds()?;
        let summaries = self.summaries.list_summaries(user_id, from, to)?;
        let leave_dates: Vec<NaiveDate> = self
            .leave
            .list_approved_leave(user_id, None, from, to)?
            .into_iter()
            .map(|r| r.date)
            .collect();

        generate_timesheet(
            user_id,
            period,
            &summaries,
            incidents,
            &leave_dates,
            remote_locations,
        )
    }
}
