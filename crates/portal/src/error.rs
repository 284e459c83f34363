use alloy_primitives::{TxHash, U256};
use alloy_transport::TransportError;

/// Convenience alias for results produced by this crate.
pub type Result<T, E = PortalError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("no wallet provider detected")]
    NoProvider,
    #[error("no authorized account, connect a wallet first")]
    NoAccount,
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error(transparent)]
    Rpc(#[from] TransportError),
    #[error("failed to decode contract data: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    #[error("contract timestamp {0} is not a valid date")]
    InvalidTimestamp(U256),
    #[error("{operation} rejected by wallet: {reason}")]
    Rejected { operation: String, reason: String },
    #[error("{operation} timed out")]
    Timeout { operation: String },
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("unknown subscription {0}")]
    UnknownSubscription(String),
    #[error("failed to render view: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("invalid rpc url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{0}")]
    Other(String),
}

impl PortalError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout { operation: operation.into() }
    }
}
