//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use capture_list::config::{AppConfig, StoreBackend};
use capture_list::list::{codec, CaptureList, DOCUMENT_PATH};
use capture_list::store::MemoryStore;
use capture_list::{HttpServer, Shutdown};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;
use tokio::net::TcpListener;

pub const USERNAME: &str = "capture";
pub const PASSWORD: &str = "correct horse";

/// A running server plus the store behind it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub domain: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server on an ephemeral port backed by a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let domain = format!("http://{}", addr);

    let mut config = AppConfig::default();
    config.listener.bind_address = addr.to_string();
    config.app.domain = domain.clone();
    config.auth.username = USERNAME.into();
    config.auth.password = PASSWORD.into();
    config.session.secret = "integration-test-session-secret".into();
    config.store.backend = StoreBackend::Memory;

    let store = Arc::new(MemoryStore::new());
    let server = HttpServer::new(config, store.clone()).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .no_proxy()
        .build()
        .unwrap();

    TestApp {
        addr,
        domain,
        store,
        client,
        shutdown,
    }
}

/// Cookie and CSRF token obtained from viewing the page.
pub struct Browser {
    pub cookie: String,
    pub csrf: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.domain, path)
    }

    pub async fn seed(&self, items: &[&str]) {
        let list: CaptureList = items.iter().copied().collect();
        self.store.insert(DOCUMENT_PATH, codec::encode(&list)).await;
    }

    pub async fn stored_items(&self) -> Vec<String> {
        let raw = self.store.get(DOCUMENT_PATH).await.expect("document exists");
        codec::decode(&raw).unwrap().items().to_vec()
    }

    pub async fn get_page(&self, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url("/")).basic_auth(USERNAME, Some(PASSWORD));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        request.send().await.unwrap()
    }

    /// View the page once and keep the session it hands out.
    pub async fn open_browser(&self) -> Browser {
        let response = self.get_page(None).await;
        assert_eq!(response.status(), 200);

        let cookie = session_cookie(&response).expect("session cookie issued");
        let html = response.text().await.unwrap();
        let csrf = csrf_token(&html).expect("csrf token rendered");
        Browser { cookie, csrf }
    }

    pub async fn post_form(&self, path: &str, browser: &Browser, fields: &[(&str, &str)]) -> reqwest::Response {
        let mut form: Vec<(&str, &str)> = fields.to_vec();
        form.push(("_csrf", browser.csrf.as_str()));
        self.client
            .post(self.url(path))
            .basic_auth(USERNAME, Some(PASSWORD))
            .header(COOKIE, &browser.cookie)
            .form(&form)
            .send()
            .await
            .unwrap()
    }
}

/// `name=value` part of the first `Set-Cookie` header.
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    let raw = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(str::to_string)
}

/// Value of the first hidden `_csrf` input.
pub fn csrf_token(html: &str) -> Option<String> {
    let marker = r#"name="_csrf" value=""#;
    let start = html.find(marker)? + marker.len();
    let len = html[start..].find('"')?;
    Some(html[start..start + len].to_string())
}
