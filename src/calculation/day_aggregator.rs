//! Day aggregation: raw clock/break events to a canonical [`DaySummary`].
//!
//! The scan is an explicit fold over the ordered event sequence. Each step
//! takes an immutable [`ScanState`] and one event and returns the next
//! state, which keeps the transition table reviewable and testable
//! transition-by-transition.
//!
//! Malformed event sequences (an orphaned `CLOCK_OUT` or `BREAK_END`) are
//! skipped and logged rather than failed: a single bad historical event
//! must never block future totals for the user.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::{DaySummary, EventType, Policy, RawEvent};

/// Everything the day scan needs, already fetched.
#[derive(Debug, Clone)]
pub struct DayScanInput<'a> {
    /// The user the day belongs to.
    pub user_id: &'a str,
    /// The local calendar date being recomputed.
    pub date: NaiveDate,
    /// The user's configured timezone.
    pub timezone: Tz,
    /// Raw events for the user. Events outside the day's boundaries are
    /// ignored; ordering is normalized internally.
    pub events: &'a [RawEvent],
    /// The instant the recomputation runs at. A still-open session is
    /// credited up to this instant when `date` is "today" in `timezone`.
    pub evaluated_at: DateTime<Utc>,
    /// The resolved policy for the user's org on this date.
    pub policy: &'a Policy,
    /// Location IDs considered home/remote for the on-site requirement.
    pub remote_locations: &'a HashSet<String>,
}

/// The running state of the event scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanState {
    /// The clock-in of the currently open work session, if any.
    pub open_clock_in: Option<DateTime<Utc>>,
    /// The start of the currently open break, if any.
    pub open_break: Option<DateTime<Utc>>,
    /// Accumulated worked milliseconds from closed sessions.
    pub worked_ms: i64,
    /// Accumulated break milliseconds from closed breaks.
    pub break_ms: i64,
    /// The first clock-in seen.
    pub first_clock_in: Option<DateTime<Utc>>,
    /// The last clock-out seen.
    pub last_clock_out: Option<DateTime<Utc>>,
    /// The last location seen on any event that carried one.
    pub last_location: Option<String>,
}

impl ScanState {
    /// Applies one event, returning the next state.
    ///
    /// A `CLOCK_IN` over an already-open session closes the prior session
    /// at the new clock-in's timestamp before opening the new one, so no
    /// worked time is silently discarded. `BREAK_START` behaves the same
    /// way for breaks.
    pub fn apply(mut self, event: &RawEvent) -> Self {
        let at = event.server_timestamp;
        if event.location_id.is_some() {
            self.last_location = event.location_id.clone();
        }

        match event.event_type {
            EventType::ClockIn => {
                if let Some(open) = self.open_clock_in {
                    warn!(
                        event_id = %event.id,
                        open_since = %open,
                        "clock-in over an open session, closing the prior session"
                    );
                    self.worked_ms += (at - open).num_milliseconds().max(0);
                }
                self.open_clock_in = Some(at);
                self.first_clock_in = self.first_clock_in.or(Some(at));
            }
            EventType::ClockOut => match self.open_clock_in.take() {
                Some(open) => {
                    self.worked_ms += (at - open).num_milliseconds().max(0);
                    self.last_clock_out = Some(at);
                }
                None => {
                    warn!(event_id = %event.id, "clock-out with no open session, skipping");
                }
            },
            EventType::BreakStart => {
                if let Some(open) = self.open_break {
                    warn!(
                        event_id = %event.id,
                        open_since = %open,
                        "break-start over an open break, closing the prior break"
                    );
                    self.break_ms += (at - open).num_milliseconds().max(0);
                }
                self.open_break = Some(at);
            }
            EventType::BreakEnd => match self.open_break.take() {
                Some(open) => {
                    self.break_ms += (at - open).num_milliseconds().max(0);
                }
                None => {
                    warn!(event_id = %event.id, "break-end with no open break, skipping");
                }
            },
        }

        self
    }
}

/// Folds an ordered event slice into a final [`ScanState`].
pub fn scan_events(events: &[RawEvent]) -> ScanState {
    events
        .iter()
        .fold(ScanState::default(), |state, event| state.apply(event))
}

/// Returns the `[start, end)` UTC instants of a local calendar date.
///
/// Local midnight can fall inside a DST gap; the day then starts at the
/// first representable local instant after it.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = resolve_local(date.and_time(NaiveTime::MIN), tz);
    let end = resolve_local(
        date.succ_opt().unwrap_or(date).and_time(NaiveTime::MIN),
        tz,
    );
    (start, end)
}

fn resolve_local(naive: chrono::NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    if let Some(resolved) = tz.from_local_datetime(&naive).earliest() {
        return resolved.with_timezone(&Utc);
    }
    let mut probe = naive;
    for _ in 0..4 {
        probe += chrono::Duration::minutes(30);
        if let Some(resolved) = tz.from_local_datetime(&probe).earliest() {
            return resolved.with_timezone(&Utc);
        }
    }
    // DST gaps are at most a couple of hours; interpret as UTC past that.
    Utc.from_utc_datetime(&naive)
}

/// Builds the canonical [`DaySummary`] for one (user, date) from scratch.
///
/// The summary is derived purely from the raw events inside the day's
/// boundaries, so calling this repeatedly with identical inputs yields an
/// identical summary. Events outside `[day_start, day_end)` are dropped and
/// the remainder re-sorted by server timestamp before the fold, so a caller
/// passing a wider or unordered slice still gets the authoritative result.
///
/// A session left open at the end of the scan is credited up to
/// `evaluated_at` when the date is "today" in the user's timezone;
/// otherwise it contributes nothing beyond its last closed boundary.
pub fn summarize_day(input: &DayScanInput<'_>) -> DaySummary {
    let (day_start, day_end) = day_bounds(input.date, input.timezone);

    let mut events: Vec<RawEvent> = input
        .events
        .iter()
        .filter(|e| e.server_timestamp >= day_start && e.server_timestamp < day_end)
        .cloned()
        .collect();
    events.sort_by_key(|e| e.server_timestamp);

    let mut state = scan_events(&events);

    if let Some(open) = state.open_clock_in {
        let is_today = input.evaluated_at.with_timezone(&input.timezone).date_naive()
            == input.date;
        if is_today {
            state.worked_ms += (input.evaluated_at - open).num_milliseconds().max(0);
        }
    }

    let total_minutes = (state.worked_ms - state.break_ms).max(0) / 60_000;
    let break_minutes = state.break_ms.max(0) / 60_000;

    let on_site = state
        .last_location
        .as_ref()
        .is_none_or(|loc| !input.remote_locations.contains(loc));
    let meets_policy = total_minutes >= input.policy.minimum_minutes_per_day && on_site;

    DaySummary {
        user_id: input.user_id.to_string(),
        date: input.date,
        total_minutes,
        break_minutes,
        first_clock_in: state.first_clock_in,
        last_clock_out: state.last_clock_out,
        meets_policy,
        location_id: state.last_location,
    }
}
