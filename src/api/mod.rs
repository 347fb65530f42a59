//! Thin HTTP surface over the engine.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    LeaveBalanceRequest, OvertimeCalculationRequest, PolicyResolveRequest, RecomputeDayRequest,
    TimesheetRequest,
};
pub use response::{ApiError, ApiErrorResponse, PolicyResolveResponse};
pub use state::AppState;
