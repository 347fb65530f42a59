//! Time Ledger & Compliance Engine
//!
//! This crate turns raw clock/break events into authoritative daily work
//! totals, applies jurisdiction-specific overtime rules, computes leave/PTO
//! balances across rolling leave years with carryover, and rolls everything
//! into payroll-ready weekly and monthly timesheets.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
