//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: request_id, stage, items, error)
//!     → request spans from tower-http's TraceLayer
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the request span
//! - Secrets and credentials are never recorded

pub mod logging;
