//! Calculation logic for the Time Ledger & Compliance Engine.
//!
//! This module contains the pure calculators: effective-policy resolution
//! with its fallback chain, the day aggregator's event-scan fold, the
//! weekly overtime split into regular/overtime/double-time buckets, the
//! leave-year and PTO balance arithmetic, and the payroll timesheet
//! aggregation. Every function here operates on already-fetched data and
//! performs no I/O.

mod day_aggregator;
mod leave_balance;
mod overtime;
mod policy_resolver;
mod timesheet;

pub use day_aggregator::{DayScanInput, ScanState, day_bounds, scan_events, summarize_day};
pub use leave_balance::{
    LeaveYear, PtoBalance, calculate_pto_balance, leave_year_window, resolve_allowance,
};
pub use overtime::{
    DailyBreakdown, DayEntry, OvertimeResult, SEVENTH_DAY_OVERTIME_CAP_MINUTES,
    calculate_weekly_overtime,
};
pub use policy_resolver::resolve_effective_policy;
pub use timesheet::{
    IncidentMinutes, PAYROLL_WEEKLY_THRESHOLD_MINUTES, generate_timesheet, payroll_policy,
};
