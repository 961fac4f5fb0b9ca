//! Signed cookie sessions.
//!
//! The cookie value is `base64url(json) "." base64url(hmac_sha256(json_b64))`.
//! Anything that fails to verify or decode is treated as "no session", and a
//! fresh one is issued.

use async_trait::async_trait;
use axum::http::HeaderValue;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use hmac::digest::MacError;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::SessionConfig;
use crate::pipeline::{Exchange, Rejection, Stage};

const TOKEN_BYTES: usize = 32;

/// State carried between requests of one browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub csrf_secret: String,
}

impl Session {
    /// New session with a random CSRF secret.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            csrf_secret: base64::encode_config(bytes, base64::URL_SAFE_NO_PAD),
        }
    }
}

/// HMAC-SHA256 signer for session cookies.
pub struct SessionSigner {
    key: Vec<u8>,
}

impl SessionSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: secret.to_vec(),
        }
    }

    pub fn sign(&self, input: &[u8]) -> Vec<u8> {
        let mut hmac = self.new_hmac();
        hmac.update(input);
        hmac.finalize().into_bytes().to_vec()
    }

    pub fn verify(&self, input: &[u8], mac: &[u8]) -> Result<(), MacError> {
        let mut hmac = self.new_hmac();
        hmac.update(input);
        hmac.verify_slice(mac)
    }

    /// Serialize and sign a session into a cookie value.
    pub fn seal(&self, session: &Session) -> String {
        let json = serde_json::to_vec(session).unwrap_or_default();
        let payload = base64::encode_config(json, base64::URL_SAFE_NO_PAD);
        let mac = base64::encode_config(self.sign(payload.as_bytes()), base64::URL_SAFE_NO_PAD);
        format!("{}.{}", payload, mac)
    }

    /// Verify and decode a cookie value.
    pub fn open(&self, value: &str) -> Option<Session> {
        let (payload, mac) = value.split_once('.')?;
        let mac = base64::decode_config(mac, base64::URL_SAFE_NO_PAD).ok()?;
        self.verify(payload.as_bytes(), &mac).ok()?;

        let json = base64::decode_config(payload, base64::URL_SAFE_NO_PAD).ok()?;
        serde_json::from_slice(&json).ok()
    }

    fn new_hmac(&self) -> Hmac<Sha256> {
        Hmac::<Sha256>::new_from_slice(&self.key)
            .expect("HMAC can take a key of any size so this cannot fail")
    }
}

/// Loads the session from its cookie, or issues a new one.
pub struct EstablishSession {
    signer: SessionSigner,
    cookie_name: String,
    secure: bool,
}

impl EstablishSession {
    pub fn new(config: &SessionConfig, domain: &str) -> Self {
        Self {
            signer: SessionSigner::new(config.secret.as_bytes()),
            cookie_name: config.cookie_name.clone(),
            secure: domain.starts_with("https://"),
        }
    }

    fn set_cookie(&self, session: &Session) -> Option<HeaderValue> {
        let cookie = Cookie::build((self.cookie_name.clone(), self.signer.seal(session)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build();

        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(error = %e, "Session cookie is not a valid header value");
                None
            }
        }
    }
}

#[async_trait]
impl Stage for EstablishSession {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<(), Rejection> {
        let jar = CookieJar::from_headers(&exchange.headers);
        let existing = jar
            .get(&self.cookie_name)
            .and_then(|cookie| self.signer.open(cookie.value()));

        let session = match existing {
            Some(session) => session,
            None => {
                let session = Session::generate();
                exchange.set_cookie = self.set_cookie(&session);
                tracing::debug!("Issued new session");
                session
            }
        };

        exchange.session = Some(session);
        Ok(())
    }
}
