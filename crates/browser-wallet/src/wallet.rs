use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, Bytes, TxHash};
use alloy_rpc_types::{Filter, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::mpsc;
use wave_portal::{LogSubscription, Result, SubscriptionId, WalletProvider};

use crate::{error::BrowserWalletError, state::BrowserWalletState, types::ProviderStatus};

/// The browser-injected wallet, reached through the page served by
/// [`BrowserWalletServer`](crate::BrowserWalletServer).
///
/// Every call is queued for the page, which forwards it to `window.ethereum` and posts the answer
/// back. Calls fail with a timeout when the page does not answer in time.
#[derive(Clone, Debug)]
pub struct BrowserWallet {
    state: Arc<BrowserWalletState>,
    timeout: Duration,
}

impl BrowserWallet {
    pub(crate) fn new(state: Arc<BrowserWalletState>, timeout: Duration) -> Self {
        Self { state, timeout }
    }

    /// What the page reported about `window.ethereum`, if it has loaded.
    pub fn provider_status(&self) -> Option<ProviderStatus> {
        self.state.provider_status()
    }

    /// Waits until the page has loaded and reported whether a wallet is installed.
    pub async fn wait_for_page(&self, timeout: Duration) -> Option<ProviderStatus> {
        let wait = async {
            loop {
                if let Some(status) = self.state.provider_status() {
                    return status;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        };
        tokio::time::timeout(timeout, wait).await.ok()
    }

    /// Forgets a subscription without relaying `eth_unsubscribe`, for when the page that held it
    /// is gone.
    pub(crate) fn release(&self, id: &SubscriptionId) -> bool {
        self.state.remove_subscription(id.as_str())
    }

    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, BrowserWalletError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params).map_err(|source| {
            BrowserWalletError::InvalidParams { method: method.to_string(), source }
        })?;
        let value = self.state.request(method, params, self.timeout).await?;
        serde_json::from_value(value)
            .map_err(|source| BrowserWalletError::InvalidResponse { method: method.to_string(), source })
    }
}

#[async_trait]
impl WalletProvider for BrowserWallet {
    fn is_available(&self) -> bool {
        self.state.is_available()
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(self.request("eth_requestAccounts", ()).await?)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.request("eth_accounts", ()).await?)
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        Ok(self.request("eth_call", (tx, "latest")).await?)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        Ok(self.request("eth_sendTransaction", (tx,)).await?)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        Ok(self.request("eth_getTransactionReceipt", (hash,)).await?)
    }

    async fn subscribe(&self, filter: Filter) -> Result<LogSubscription> {
        let id: String = self.request("eth_subscribe", ("logs", filter)).await?;
        let (sender, logs) = mpsc::unbounded_channel();
        self.state.add_subscription(id.clone(), sender);
        debug!(target: "browser_wallet", %id, "subscribed to logs");
        Ok(LogSubscription { id: SubscriptionId::new(id), logs })
    }

    async fn unsubscribe(&self, id: &SubscriptionId) -> Result<()> {
        if !self.state.remove_subscription(id.as_str()) {
            return Err(BrowserWalletError::UnknownSubscription(id.to_string()).into());
        }
        let _: bool = self.request("eth_unsubscribe", (id.as_str(),)).await?;
        Ok(())
    }
}
