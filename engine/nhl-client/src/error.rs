//! Error types for the NHL API client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NhlClientError {
    /// Transport-level failure reaching the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// A response was received but did not match the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl NhlClientError {
    /// True when the response arrived but its structure was unusable,
    /// as opposed to a transport failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, NhlClientError::Decode { .. })
    }
}
