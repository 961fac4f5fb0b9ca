//! HTTP Basic authentication against a single configured user.

use async_trait::async_trait;
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::pipeline::{Exchange, Rejection, Stage};

pub struct BasicAuth {
    username: String,
    password: String,
    realm: String,
}

impl BasicAuth {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            realm: config.realm.clone(),
        }
    }

    fn accepts(&self, credentials: &Authorization<Basic>) -> bool {
        // Evaluate both so timing does not reveal which one was wrong.
        let user_ok = credentials.username().as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = credentials.password().as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & pass_ok).into()
    }

    fn reject(&self) -> Rejection {
        Rejection::Unauthorized {
            realm: self.realm.clone(),
        }
    }
}

#[async_trait]
impl Stage for BasicAuth {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<(), Rejection> {
        match exchange.headers.typed_get::<Authorization<Basic>>() {
            Some(credentials) if self.accepts(&credentials) => Ok(()),
            Some(_) => {
                tracing::debug!("Basic credentials rejected");
                Err(self.reject())
            }
            None => Err(self.reject()),
        }
    }
}
