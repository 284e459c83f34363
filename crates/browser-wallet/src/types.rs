use alloy_primitives::ChainId;
use alloy_rpc_types::Log;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// What the page found in `window.ethereum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
}

/// An EIP-1193 request waiting to be relayed by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRequest {
    pub id: Uuid,
    pub method: String,
    pub params: Value,
}

/// The page's answer to a [`WalletRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletResponse {
    pub id: Uuid,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Payload of an `eth_subscription` message emitted by the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionMessage {
    pub subscription: String,
    pub result: Log,
}

/// Rendered state pushed to the page after every interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewResponse {
    pub connected: bool,
    pub nav: String,
    pub composer: String,
    pub waves: String,
    pub alerts: Vec<String>,
}

/// Body of `POST /api/ui/wave`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveForm {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum BrowserApiResponse<T = ()> {
    Ok(T),
    Error { message: String },
}

impl BrowserApiResponse<()> {
    pub fn ok() -> Self {
        Self::Ok(())
    }
}

impl<T> BrowserApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}
