//! Body buffering and urlencoded form parsing.

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;

use crate::pipeline::{Exchange, Form, Rejection, Stage};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub struct ParseBody {
    limit: usize,
}

impl ParseBody {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

fn is_form(exchange: &Exchange) -> bool {
    exchange
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

#[async_trait]
impl Stage for ParseBody {
    fn name(&self) -> &'static str {
        "parse_body"
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<(), Rejection> {
        let body = std::mem::take(&mut exchange.body);
        exchange.raw_body = axum::body::to_bytes(body, self.limit)
            .await
            .map_err(|e| Rejection::Body(e.to_string()))?;

        // Other content types are passed through with an empty form.
        if is_form(exchange) {
            exchange.form = url::form_urlencoded::parse(&exchange.raw_body)
                .into_owned()
                .collect::<Form>();
        }
        Ok(())
    }
}
