use std::time::Duration;
use wave_portal::PortalError;

#[derive(Debug, thiserror::Error)]
pub enum BrowserWalletError {
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: String, reason: String },
    #[error("{operation} timed out after {timeout:?}")]
    Timeout { operation: String, timeout: Duration },
    #[error("invalid response to {method}: {source}")]
    InvalidResponse {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {method} params: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown subscription {0}")]
    UnknownSubscription(String),
    #[error("browser wallet server error: {0}")]
    Server(#[from] std::io::Error),
}

impl From<BrowserWalletError> for PortalError {
    fn from(err: BrowserWalletError) -> Self {
        match err {
            BrowserWalletError::Rejected { operation, reason } => {
                Self::Rejected { operation, reason }
            }
            BrowserWalletError::Timeout { operation, .. } => Self::Timeout { operation },
            BrowserWalletError::UnknownSubscription(id) => Self::UnknownSubscription(id),
            other => Self::Other(other.to_string()),
        }
    }
}
