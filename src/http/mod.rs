//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, tracing, security headers, limits)
//!     → pipeline (auth, body, sanitize, session, CSRF, context)
//!     → handlers.rs (view / add / delete)
//!     → response.rs (HTML, redirect, or generic error)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::{AppError, GENERIC_ERROR_MESSAGE};
pub use server::{AppState, HttpServer};
