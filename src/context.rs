//! Per-request context.

use std::fmt;
use std::sync::Arc;

use crate::store::DocumentStore;

/// Everything a handler needs to serve one request.
///
/// Built by the pipeline's context stage after authentication, session and
/// CSRF checks have passed, then handed explicitly to the handler and every
/// repository call. Dropped with the request.
#[derive(Clone)]
pub struct RequestContext {
    pub store: Arc<dyn DocumentStore>,
    /// Public base URL; the only redirect target.
    pub domain: String,
    /// Token that must accompany the next mutating request.
    pub csrf_token: String,
}

impl RequestContext {
    pub fn new(store: Arc<dyn DocumentStore>, domain: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            store,
            domain: domain.into(),
            csrf_token: csrf_token.into(),
        }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}
