//! The wallet capability the session is built on.
//!
//! A [`WalletProvider`] is the minimal slice of an EIP-1193 provider the portal needs: account
//! authorization, read-only calls, transaction submission and log subscriptions. Implementations
//! exist for a JSON-RPC node ([`RpcWallet`](crate::rpc::RpcWallet)) and for a browser-injected
//! wallet relayed over a local bridge.

use crate::{PortalError, Result};
use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_rpc_types::{Filter, Log, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

/// Identifier of an active log subscription, as returned by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live log subscription: matching logs arrive on `logs` until the subscription is cancelled
/// through [`WalletProvider::unsubscribe`].
#[derive(Debug)]
pub struct LogSubscription {
    pub id: SubscriptionId,
    pub logs: mpsc::UnboundedReceiver<Log>,
}

#[async_trait]
pub trait WalletProvider: fmt::Debug + Send + Sync {
    /// Whether a wallet is present at all.
    fn is_available(&self) -> bool {
        true
    }

    /// `eth_requestAccounts`: asks the user to authorize accounts.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// `eth_accounts`: accounts already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// `eth_call` against the latest block.
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes>;

    /// `eth_sendTransaction`: signs and broadcasts `tx`.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>>;

    async fn subscribe(&self, filter: Filter) -> Result<LogSubscription>;

    async fn unsubscribe(&self, id: &SubscriptionId) -> Result<()>;
}

/// Polls for the receipt of `hash` until it is mined or `timeout` elapses.
///
/// A mined transaction with a failed status is reported as [`PortalError::Reverted`].
pub async fn wait_for_receipt(
    provider: &dyn WalletProvider,
    hash: TxHash,
    interval: Duration,
    timeout: Duration,
) -> Result<TransactionReceipt> {
    let start = Instant::now();
    loop {
        if let Some(receipt) = provider.transaction_receipt(hash).await? {
            if !receipt.status() {
                return Err(PortalError::Reverted(hash));
            }
            return Ok(receipt);
        }
        if start.elapsed() >= timeout {
            return Err(PortalError::timeout(format!("waiting for transaction {hash}")));
        }
        trace!(target: "portal::provider", %hash, "transaction not mined yet");
        tokio::time::sleep(interval).await;
    }
}
