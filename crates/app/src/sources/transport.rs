//! HTTP transport for source provider APIs.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use crate::sources::SourceFetchError;

/// Raw response from a source provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Decode a successful JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SourceFetchError::Status`] for non-2xx responses and
    /// [`SourceFetchError::Malformed`] when the body cannot be decoded as `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, SourceFetchError> {
        if !(200..300).contains(&self.status) {
            return Err(SourceFetchError::Status {
                status: self.status,
                body: self.body,
            });
        }

        serde_json::from_str(&self.body).map_err(SourceFetchError::Malformed)
    }
}

/// Authenticated read access to a provider API.
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a `GET` request against `url` with the given query parameters.
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<TransportResponse, SourceFetchError>;
}

/// [`Transport`] backed by `reqwest` with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api_key: Zeroizing<String>,
    http: Client,
}

impl HttpTransport {
    /// Create a transport sending `accept` as the `Accept` header on every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the `Accept` value is not a valid header or the HTTP client
    /// cannot be built.
    pub fn new(api_key: Zeroizing<String>, accept: &'static str) -> Result<Self, SourceFetchError> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static(accept));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { api_key, http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(name = "sources.transport.get", skip(self, query), err)]
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<TransportResponse, SourceFetchError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(self.api_key.as_str())
            .query(query)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "received source response");

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Body {
        ok: bool,
    }

    #[test]
    fn json_decodes_success_body() -> TestResult {
        let response = TransportResponse {
            status: 200,
            body: r#"{"ok":true}"#.to_string(),
        };

        assert_eq!(response.json::<Body>()?, Body { ok: true });

        Ok(())
    }

    #[test]
    fn json_rejects_error_status() {
        let response = TransportResponse {
            status: 401,
            body: "unauthorized".to_string(),
        };

        let result = response.json::<Body>();

        assert!(
            matches!(result, Err(SourceFetchError::Status { status: 401, .. })),
            "expected status error, got {result:?}"
        );
    }

    #[test]
    fn json_rejects_unexpected_shape() {
        let response = TransportResponse {
            status: 200,
            body: r#"{"data":[]}"#.to_string(),
        };

        let result = response.json::<Body>();

        assert!(
            matches!(result, Err(SourceFetchError::Malformed(_))),
            "expected malformed error, got {result:?}"
        );
    }
}
