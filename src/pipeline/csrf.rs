//! CSRF verification for state-changing methods.

use async_trait::async_trait;
use axum::http::Method;
use subtle::ConstantTimeEq;

use crate::pipeline::{Exchange, Rejection, Stage};

/// Form field carrying the token.
pub const CSRF_FIELD: &str = "_csrf";
/// Header alternative to the form field.
pub const CSRF_HEADER: &str = "x-csrf-token";

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

pub struct VerifyCsrf;

#[async_trait]
impl Stage for VerifyCsrf {
    fn name(&self) -> &'static str {
        "csrf"
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<(), Rejection> {
        if is_safe(&exchange.method) {
            return Ok(());
        }

        let session = exchange
            .session
            .as_ref()
            .ok_or(Rejection::Misconfigured("csrf"))?;

        let supplied = exchange.form.get(CSRF_FIELD).or_else(|| {
            exchange
                .headers
                .get(CSRF_HEADER)
                .and_then(|v| v.to_str().ok())
        });

        match supplied {
            Some(token) if bool::from(token.as_bytes().ct_eq(session.csrf_secret.as_bytes())) => Ok(()),
            _ => Err(Rejection::InvalidCsrf),
        }
    }
}
