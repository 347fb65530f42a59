//! Canonical daily work summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row per (user, date): the canonical daily aggregate derived from
/// raw clock events.
///
/// A `DaySummary` is always recomputable purely from the raw events inside
/// the day's boundaries in the user's timezone. Recomputation fully replaces
/// the previous summary, so re-running with identical events yields an
/// identical summary — never an incremental delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// The user the summary belongs to.
    pub user_id: String,
    /// The local calendar date, in the user's configured timezone.
    pub date: NaiveDate,
    /// Minutes worked, breaks excluded. Never negative.
    pub total_minutes: i64,
    /// Minutes spent on break.
    pub break_minutes: i64,
    /// The first clock-in of the day, if any.
    pub first_clock_in: Option<DateTime<Utc>>,
    /// The last clock-out of the day, if any.
    pub last_clock_out: Option<DateTime<Utc>>,
    /// Whether the day satisfies the resolved policy's daily minimum and
    /// on-site requirement.
    pub meets_policy: bool,
    /// The day's primary (last seen) location.
    pub location_id: Option<String>,
}
