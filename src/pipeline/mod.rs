//! Request pipeline.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → auth.rs      (HTTP Basic credentials)
//!     → body.rs      (buffer + parse urlencoded form)
//!     → sanitize.rs  (strip markup from form fields)
//!     → session.rs   (verify or issue signed session cookie)
//!     → csrf.rs      (token must match session on mutating methods)
//!     → context.rs   (build RequestContext for the handler)
//!     → route handler
//! ```
//!
//! # Design Decisions
//! - Stages are an explicit ordered list, run by a single axum middleware
//! - The first failing stage rejects the request; later stages never run
//! - Handlers receive the parsed [`Form`] and the [`RequestContext`] as
//!   request extensions

pub mod auth;
pub mod body;
pub mod context;
pub mod csrf;
pub mod sanitize;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use thiserror::Error;

use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::store::DocumentStore;

pub use session::Session;

/// Form fields parsed from an urlencoded body. Later duplicates win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form(HashMap<String, String>);

impl Form {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut String)> {
        self.0.iter_mut()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Form {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Mutable view of a request while it moves through the stages.
pub struct Exchange {
    pub method: Method,
    pub headers: HeaderMap,
    /// Unread body; taken by the body stage.
    pub body: Body,
    /// Buffered body, filled by the body stage.
    pub raw_body: Bytes,
    pub form: Form,
    pub session: Option<Session>,
    /// `Set-Cookie` value to attach to the response.
    pub set_cookie: Option<HeaderValue>,
    pub context: Option<RequestContext>,
}

impl Exchange {
    pub fn new(method: Method, headers: HeaderMap, body: Body) -> Self {
        Self {
            method,
            headers,
            body,
            raw_body: Bytes::new(),
            form: Form::default(),
            session: None,
            set_cookie: None,
            context: None,
        }
    }
}

/// Why a stage refused a request.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("missing or invalid credentials")]
    Unauthorized { realm: String },

    #[error("request body could not be read: {0}")]
    Body(String),

    #[error("missing or invalid CSRF token")]
    InvalidCsrf,

    #[error("stage '{0}' requires an earlier stage that did not run")]
    Misconfigured(&'static str),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Unauthorized { realm } => {
                let challenge = format!("Basic realm=\"{}\"", realm.replace('"', ""));
                let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
                if let Ok(value) = HeaderValue::from_str(&challenge) {
                    response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
                }
                response
            }
            Rejection::Body(_) => (StatusCode::BAD_REQUEST, "Invalid request body").into_response(),
            Rejection::InvalidCsrf => (StatusCode::FORBIDDEN, "Invalid CSRF token").into_response(),
            Rejection::Misconfigured(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, crate::http::GENERIC_ERROR_MESSAGE).into_response()
            }
        }
    }
}

/// One request-processing step.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable name for logs.
    fn name(&self) -> &'static str;

    async fn process(&self, exchange: &mut Exchange) -> Result<(), Rejection>;
}

/// Ordered list of stages run before every route handler.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// authenticate → parse body → sanitize → session → CSRF → context.
    pub fn standard(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self::new(vec![
            Box::new(auth::BasicAuth::new(&config.auth)),
            Box::new(body::ParseBody::new(config.security.max_body_size)),
            Box::new(sanitize::SanitizeForm),
            Box::new(session::EstablishSession::new(&config.session, &config.app.domain)),
            Box::new(csrf::VerifyCsrf),
            Box::new(context::InjectContext::new(store, &config.app.domain)),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, stopping at the first rejection.
    pub async fn run(&self, exchange: &mut Exchange) -> Result<(), Rejection> {
        for stage in &self.stages {
            if let Err(rejection) = stage.process(exchange).await {
                tracing::warn!(stage = stage.name(), reason = %rejection, "Request rejected");
                return Err(rejection);
            }
        }
        Ok(())
    }
}

/// Axum middleware running the pipeline ahead of the route handlers.
pub async fn run_pipeline(
    State(pipeline): State<Arc<Pipeline>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let mut exchange = Exchange::new(parts.method.clone(), parts.headers.clone(), body);

    if let Err(rejection) = pipeline.run(&mut exchange).await {
        return rejection.into_response();
    }

    let Exchange {
        raw_body,
        form,
        set_cookie,
        context,
        ..
    } = exchange;

    parts.extensions.insert(form);
    if let Some(ctx) = context {
        parts.extensions.insert(ctx);
    }

    let mut response = next.run(Request::from_parts(parts, Body::from(raw_body))).await;
    if let Some(cookie) = set_cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
