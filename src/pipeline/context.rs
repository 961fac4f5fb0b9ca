//! Builds the per-request [`RequestContext`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::pipeline::{Exchange, Rejection, Stage};
use crate::store::DocumentStore;

pub struct InjectContext {
    store: Arc<dyn DocumentStore>,
    domain: String,
}

impl InjectContext {
    pub fn new(store: Arc<dyn DocumentStore>, domain: &str) -> Self {
        Self {
            store,
            domain: domain.to_string(),
        }
    }
}

#[async_trait]
impl Stage for InjectContext {
    fn name(&self) -> &'static str {
        "context"
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<(), Rejection> {
        let session = exchange
            .session
            .as_ref()
            .ok_or(Rejection::Misconfigured("context"))?;

        exchange.context = Some(RequestContext::new(
            self.store.clone(),
            self.domain.clone(),
            session.csrf_secret.clone(),
        ));
        Ok(())
    }
}
