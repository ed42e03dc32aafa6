//! HTTP API module for the Staffing Compliance Engine.
//!
//! Exposes day and month evaluation over JSON. The handlers map raw
//! records, run the engine and wrap the result; they hold no state beyond
//! the rule tables loaded at startup.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DayRequest, MonthRequest};
pub use response::{ApiError, DayResponse, MonthResponse, RejectedDayResponse};
pub use state::AppState;
