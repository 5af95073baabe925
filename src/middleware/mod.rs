//! Middleware module
//!
//! HTTP middleware for session authorization and request logging.

pub mod auth;
pub mod logging;

pub use auth::{require_session, AuthError, AuthState, SessionInfo};
pub use logging::{log_request, TraceId, REQUEST_ID_HEADER, TRACE_ID_HEADER};
