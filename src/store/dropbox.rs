//! Dropbox content API client.
//!
//! Uses the two content endpoints:
//! - `POST /2/files/download` with the path in the `Dropbox-API-Arg` header
//! - `POST /2/files/upload` with the path and write mode in the same header
//!
//! A missing file is reported by Dropbox as HTTP 409 with an
//! `error_summary` starting with `path/not_found`. Only that exact summary is
//! mapped to [`Fetched::NotFound`]; every other 409 is an error.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::store::{DocumentStore, Fetched, StoreError};

const API_ARG_HEADER: &str = "Dropbox-API-Arg";
const NOT_FOUND_SUMMARY: &str = "path/not_found";

#[derive(Serialize)]
struct DownloadArg<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'static str,
    autorename: bool,
    mute: bool,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error_summary: String,
}

/// Document store backed by a Dropbox account.
#[derive(Clone)]
pub struct DropboxStore {
    client: Client,
    api_base: String,
    access_token: String,
}

impl DropboxStore {
    /// Create a client from store configuration.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/2/{}", self.api_base, route)
    }

    fn api_arg<T: Serialize>(path: &str, arg: &T) -> Result<String, StoreError> {
        serde_json::to_string(arg).map_err(|e| StoreError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Decide whether a 409 body means "no such file".
fn is_not_found(body: &str) -> bool {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error_summary.starts_with(NOT_FOUND_SUMMARY))
        .unwrap_or(false)
}

#[async_trait]
impl DocumentStore for DropboxStore {
    async fn fetch(&self, path: &str) -> Result<Fetched, StoreError> {
        let arg = Self::api_arg(path, &DownloadArg { path })?;

        let response = self
            .client
            .post(self.endpoint("files/download"))
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(API_ARG_HEADER, arg)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let contents = response.bytes().await?;
            tracing::debug!(path = %path, bytes = contents.len(), "Downloaded document");
            return Ok(Fetched::Found(contents));
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT && is_not_found(&body) {
            tracing::debug!(path = %path, "Document does not exist");
            return Ok(Fetched::NotFound);
        }

        Err(StoreError::Status {
            status: status.as_u16(),
            path: path.to_string(),
            body,
        })
    }

    async fn put(&self, path: &str, contents: Bytes) -> Result<(), StoreError> {
        let arg = Self::api_arg(
            path,
            &UploadArg {
                path,
                mode: "overwrite",
                autorename: false,
                mute: true,
            },
        )?;
        let len = contents.len();

        let response = self
            .client
            .post(self.endpoint("files/upload"))
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(API_ARG_HEADER, arg)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(contents)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        tracing::debug!(path = %path, bytes = len, "Uploaded document");
        Ok(())
    }
}
