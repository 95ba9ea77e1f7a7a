use crate::product::{Product, decode_products};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching the product list.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("API error: HTTP {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    DecodeError(#[from] serde_json::Error),
}

impl FetchError {
    /// Message shown to the user in the dashboard's error banner.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::ApiError { status, message } => {
                format!("Failed to fetch products (HTTP {}): {}", status, message)
            }
            FetchError::HttpError(e) if e.is_timeout() => {
                "Failed to fetch products: request timed out".to_string()
            }
            FetchError::HttpError(e) => format!("Network error: {}", e),
            FetchError::IoError(e) => format!("Could not read product file: {}", e),
            FetchError::DecodeError(e) => format!("Invalid product data: {}", e),
        }
    }
}

/// Where the store pulls its product list from.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Product>, FetchError>;

    /// Short human-readable origin for logs and the header.
    fn describe(&self) -> String;
}

/// Products API over HTTP (`GET {base}/products?limit=0`).
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("product-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn products_url(&self) -> String {
        format!("{}/products?limit=0", self.base_url)
    }
}

#[async_trait]
impl ProductSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Product>, FetchError> {
        let url = self.products_url();
        tracing::debug!(%url, "requesting products");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            return Err(FetchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        // Transport failures stay HttpError; a bad body is a DecodeError.
        let body = response.bytes().await?;
        Ok(decode_products(&body)?)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Products read from a local JSON file (envelope or bare array).
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ProductSource for FileSource {
    async fn fetch(&self) -> Result<Vec<Product>, FetchError> {
        tracing::debug!(path = %self.path.display(), "reading products file");
        let raw = tokio::fs::read(&self.path).await?;
        Ok(decode_products(&raw)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
