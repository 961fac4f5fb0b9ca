//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the three capture list routes
//! - Wire up middleware (request ID, tracing, security headers, timeout,
//!   body limit, request pipeline)
//! - Bind server to listener and shut down on signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use handlebars::TemplateError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers;
use crate::pipeline::{run_pipeline, Pipeline};
use crate::security::with_security_headers;
use crate::store::DocumentStore;
use crate::view::View;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub view: Arc<View>,
}

/// HTTP server for the capture list.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and store.
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Result<Self, TemplateError> {
        let state = AppState {
            view: Arc::new(View::new(config.app.title.clone())?),
        };
        let pipeline = Arc::new(Pipeline::standard(&config, store));

        tracing::debug!(stages = ?pipeline.stage_names(), "Request pipeline assembled");

        let router = Self::build_router(&config, state, pipeline);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState, pipeline: Arc<Pipeline>) -> Router {
        let routes = Router::new()
            .route("/", get(handlers::view_list).post(handlers::add_item))
            .route("/delete/{index}", post(handlers::delete_item))
            .with_state(state)
            .layer(middleware::from_fn_with_state(pipeline, run_pipeline))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        with_security_headers(routes)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            domain = %self.config.app.domain,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }
}
