//! Domain models for the Time Ledger & Compliance Engine.

mod event;
mod leave;
mod policy;
mod timesheet;
mod work_day;

pub use event::{EventType, RawEvent};
pub use leave::{LeaveAllowanceOverride, LeaveRequest, LeaveStatus, LeaveType};
pub use policy::Policy;
pub use timesheet::{Timesheet, TimesheetPeriod, TimesheetTotals, WeekBreakdown};
pub use work_day::DaySummary;
