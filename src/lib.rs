//! Capture list: an authenticated web form over a single remote JSON document.

pub mod config;
pub mod context;
pub mod http;
pub mod lifecycle;
pub mod list;
pub mod observability;
pub mod pipeline;
pub mod security;
pub mod store;
pub mod view;

pub use config::AppConfig;
pub use context::RequestContext;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use list::CaptureList;
