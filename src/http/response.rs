//! Response helpers.
//!
//! # Responsibilities
//! - Map handler failures to the single generic 500 response
//! - Build the post-write redirect to the configured domain
//!
//! # Design Decisions
//! - Error detail goes to the log only; clients always see the same message
//! - The redirect target never comes from request data

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::list::ListError;

/// Body of every 500 response.
pub const GENERIC_ERROR_MESSAGE: &str = "An error has occured. Check logs.";

/// Failures inside a route handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    List(#[from] ListError),

    #[error("rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, detail = ?self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE).into_response()
    }
}

/// `302 Found` back to the list page.
pub fn redirect_home(domain: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, domain.to_string())]).into_response()
}
