//! Raw clock/break event model.
//!
//! Raw events are immutable, append-only facts owned by the external event
//! ledger. The engine only ever reads ordered slices of them by user and
//! time range; it never writes or mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of action a raw event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// The user started a work session.
    ClockIn,
    /// The user ended a work session.
    ClockOut,
    /// The user started a break.
    BreakStart,
    /// The user ended a break.
    BreakEnd,
}

/// An immutable clock or break fact recorded by the event ledger.
///
/// Ordering is always by `server_timestamp`; the client timestamp is kept
/// for audit purposes only and plays no part in aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Unique identifier of the event.
    pub id: Uuid,
    /// The user the event belongs to.
    pub user_id: String,
    /// What happened.
    pub event_type: EventType,
    /// When the server recorded the event. Authoritative for ordering.
    pub server_timestamp: DateTime<Utc>,
    /// When the client claims the event happened.
    pub client_timestamp: DateTime<Utc>,
    /// The location the event was recorded at, if known.
    pub location_id: Option<String>,
}

impl RawEvent {
    /// Convenience constructor used heavily in tests: server and client
    /// timestamps are set to the same instant.
    pub fn new(
        user_id: impl Into<String>,
        event_type: EventType,
        at: DateTime<Utc>,
        location_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            event_type,
            server_timestamp: at,
            client_timestamp: at,
            location_id,
        }
    }
}
