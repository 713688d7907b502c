//! Destination API client.

use async_trait::async_trait;
use mockall::automock;
use porter::destination::DestinationDiscountRequest;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

pub mod brands;

pub use brands::{BrandChoice, BrandError, resolve_brand};

/// Destination connection settings.
#[derive(Debug, Clone)]
pub struct DestinationConfig {
    /// API address, e.g. `"https://api.example.com"`.
    pub base_url: String,

    /// Bearer API key.
    pub api_key: Zeroizing<String>,
}

/// A destination brand discounts can be created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub brand_id: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// Discount as returned by the create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedDiscount {
    pub discount_id: String,
    pub code: String,
}

/// Errors that can occur when calling the destination.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The destination returned a non-2xx response.
    #[error("destination returned {status}: {body}")]
    UnexpectedResponse { status: StatusCode, body: String },
}

impl DestinationError {
    /// HTTP status of a rejected call, if the destination answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(error) => error.status(),
            Self::UnexpectedResponse { status, .. } => Some(*status),
        }
    }
}

/// Destination operations used by a migration.
#[automock]
#[async_trait]
pub trait DestinationApi: Send + Sync {
    /// List the brands visible to the API key.
    async fn list_brands(&self) -> Result<Vec<Brand>, DestinationError>;

    /// Create one discount.
    async fn create_discount(
        &self,
        request: &DestinationDiscountRequest,
    ) -> Result<CreatedDiscount, DestinationError>;
}

/// HTTP client for the destination API.
#[derive(Debug, Clone)]
pub struct HttpDestination {
    config: DestinationConfig,
    http: Client,
}

impl HttpDestination {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: DestinationConfig) -> Self {
        Self {
            config: DestinationConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key,
            },
            http: Client::new(),
        }
    }

    async fn ensure_success(
        response: reqwest::Response,
        action: &str,
    ) -> Result<reqwest::Response, DestinationError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        debug!(action, %status, "destination rejected request");

        Err(DestinationError::UnexpectedResponse { status, body })
    }
}

#[async_trait]
impl DestinationApi for HttpDestination {
    #[tracing::instrument(name = "destination.list_brands", skip(self), err)]
    async fn list_brands(&self) -> Result<Vec<Brand>, DestinationError> {
        let url = format!("{}/brands", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.config.api_key.as_str())
            .send()
            .await?;

        let parsed: BrandsResponse = Self::ensure_success(response, "list brands")
            .await?
            .json()
            .await?;

        debug!(count = parsed.items.len(), "listed brands");

        Ok(parsed.items)
    }

    #[tracing::instrument(
        name = "destination.create_discount",
        skip(self, request),
        fields(code = %request.code, brand_id = %request.brand_id),
        err
    )]
    async fn create_discount(
        &self,
        request: &DestinationDiscountRequest,
    ) -> Result<CreatedDiscount, DestinationError> {
        let url = format!("{}/discounts", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key.as_str())
            .json(request)
            .send()
            .await?;

        let created = Self::ensure_success(response, "create discount")
            .await?
            .json()
            .await?;

        Ok(created)
    }
}

#[derive(Debug, Deserialize)]
struct BrandsResponse {
    items: Vec<Brand>,
}
