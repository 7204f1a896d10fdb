//! Error types for the sync pipeline.

use nhl_client::NhlClientError;
use stats_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure fetching a full-season snapshot. Aborts the
    /// enclosing sync call; the trigger layer decides whether to retry.
    #[error("provider unavailable fetching {endpoint}: {source}")]
    ProviderUnavailable {
        endpoint: &'static str,
        #[source]
        source: NhlClientError,
    },

    /// A snapshot arrived without its expected top-level collection.
    #[error("malformed {endpoint} snapshot: {message}")]
    MalformedSnapshot { endpoint: &'static str, message: String },

    /// Caller-supplied season failed validation. Rejected before any fetch.
    #[error("invalid season id: {0}")]
    InvalidSeasonId(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Classify a client error for a full-snapshot fetch: decode failures
    /// mean the snapshot was malformed, everything else means the provider
    /// was unreachable or unusable.
    pub(crate) fn from_client(endpoint: &'static str, err: NhlClientError) -> Self {
        match err {
            NhlClientError::Decode { message, .. } => {
                SyncError::MalformedSnapshot { endpoint, message }
            }
            other => SyncError::ProviderUnavailable { endpoint, source: other },
        }
    }
}
