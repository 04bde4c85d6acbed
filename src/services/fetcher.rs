// src/services/fetcher.rs

//! Page fetching service.
//!
//! One GET per call, no retry. Anything short of a successful response
//! with a readable body is a `FetchFailed`.

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;
use crate::utils::http;

/// Source of raw page content.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieve the raw bytes behind `url`.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// HTTP(S) page source backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a client built from the given configuration.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::with_client(http::create_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::fetch(url.as_str(), describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(
                url.as_str(),
                format!("server responded with HTTP {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(url.as_str(), describe(&e)))?;

        log::info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
