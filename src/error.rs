//! Error types for the Time Ledger & Compliance Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during ledger calculations.
//!
//! Data inconsistencies in the event stream (an orphaned `BREAK_END`, a
//! `CLOCK_OUT` with no open session) are deliberately *not* represented
//! here: the day aggregator skips the offending event and logs it, so a
//! single malformed historical event never blocks future totals.

use thiserror::Error;

/// The main error type for the Time Ledger & Compliance Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use ledger_engine::error::EngineError;
///
/// let error = EngineError::InvalidDayCount { expected: 7, actual: 5 };
/// assert_eq!(
///     error.to_string(),
///     "Expected exactly 7 day entries, got 5"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required configuration value is missing and no fallback applies.
    ///
    /// The policy resolver's hard-coded terminal fallback makes this a
    /// programming-invariant violation rather than a runtime condition.
    #[error("Configuration missing: {message}")]
    ConfigurationMissing {
        /// A description of the missing configuration.
        message: String,
    },

    /// The jurisdiction rule table could not be loaded.
    #[error("Failed to load jurisdiction rules from '{path}': {message}")]
    JurisdictionConfigError {
        /// The path that failed to load.
        path: String,
        /// A description of the load or parse error.
        message: String,
    },

    /// The overtime calculator received the wrong number of day entries.
    #[error("Expected exactly {expected} day entries, got {actual}")]
    InvalidDayCount {
        /// The required number of entries.
        expected: usize,
        /// The number of entries actually supplied.
        actual: usize,
    },

    /// The overtime calculator received a week that is not Monday-first
    /// or not made of consecutive dates.
    #[error("Invalid week: {message}")]
    InvalidWeek {
        /// A description of what made the week invalid.
        message: String,
    },

    /// A leave-year anchor was outside the valid month/day range.
    #[error("Invalid leave-year anchor: month {month}, day {day}")]
    InvalidLeaveYearAnchor {
        /// The configured anchor month.
        month: u32,
        /// The configured anchor day.
        day: u32,
    },

    /// A timesheet period was malformed (e.g. month outside 1-12).
    #[error("Invalid timesheet period: {message}")]
    InvalidPeriod {
        /// A description of what made the period invalid.
        message: String,
    },

    /// A timezone identifier was not recognized.
    #[error("Unknown timezone: {name}")]
    UnknownTimezone {
        /// The identifier that failed to parse.
        name: String,
    },

    /// An external store operation failed.
    #[error("Store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
