//! Source import errors.

use thiserror::Error;

/// Failures while reading discounts from a source provider.
///
/// Any of these aborts the whole import; partial results are never returned.
#[derive(Debug, Error)]
pub enum SourceFetchError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider reported an error inside an otherwise readable body.
    #[error("provider returned an error: {0}")]
    Upstream(String),

    /// The response body did not have the expected shape.
    #[error("malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),

    /// A pagination cursor could not be interpreted.
    #[error("invalid page cursor {0:?}")]
    InvalidCursor(String),

    /// The provider reported more pages but gave nothing to continue from.
    #[error("provider reported more pages without a cursor to continue from")]
    MissingCursor,

    /// A discount carried neither a percentage nor a fixed amount.
    #[error("discount {0:?} has no amount")]
    MissingAmount(String),

    /// A timestamp in the response could not be represented.
    #[error("invalid timestamp in response: {0}")]
    Timestamp(#[source] jiff::Error),
}
