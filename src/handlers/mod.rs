//! Request handlers invoked once per Lambda invocation.
//!
//! Handlers take their settings and collaborators explicitly so each
//! invocation owns its full request/response cycle.

pub mod forced_error;
pub mod log_alert;
