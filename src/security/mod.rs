//! Security subsystem.
//!
//! Authentication, CSRF and input sanitization run as pipeline stages (see
//! [`crate::pipeline`]). This module holds the response-side hardening.

pub mod headers;

pub use headers::with_security_headers;
