//! [`WalletProvider`] backed by a JSON-RPC node.

use crate::{
    PortalError, Result,
    provider::{LogSubscription, SubscriptionId, WalletProvider},
};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{Filter, TransactionReceipt, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::{collections::HashMap, fmt, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle};
use url::Url;
use uuid::Uuid;

/// Talks to a node over HTTP.
///
/// With a local signer, transactions are signed in-process and the signer is the only account.
/// Without one, the node's own (unlocked) accounts are used.
pub struct RpcWallet {
    provider: DynProvider,
    signer: Option<Address>,
    poll_interval: Duration,
    subscriptions: Mutex<HashMap<SubscriptionId, JoinHandle<()>>>,
}

impl fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcWallet")
            .field("signer", &self.signer)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl RpcWallet {
    pub fn connect(rpc_url: &str, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let url = normalize_url(rpc_url)?;
        let (provider, signer) = match signer {
            Some(signer) => {
                let address = signer.address();
                let provider =
                    ProviderBuilder::new().wallet(EthereumWallet::from(signer)).connect_http(url);
                (provider.erased(), Some(address))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };
        Ok(Self {
            provider,
            signer,
            poll_interval: Duration::from_secs(1),
            subscriptions: Mutex::default(),
        })
    }

    /// Sets how often log filters are polled.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Accepts `host:port` shorthands for local nodes.
fn normalize_url(rpc_url: &str) -> Result<Url> {
    let rpc_url = rpc_url.trim();
    if rpc_url.starts_with("localhost:") || rpc_url.starts_with("127.0.0.1:") {
        return Ok(Url::parse(&format!("http://{rpc_url}"))?);
    }
    Ok(Url::parse(rpc_url)?)
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        if let Some(signer) = self.signer {
            return Ok(vec![signer]);
        }
        match self
            .provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
            .await
        {
            Ok(accounts) => Ok(accounts),
            Err(err) => {
                debug!(target: "portal::rpc", %err, "eth_requestAccounts unsupported, using eth_accounts");
                self.accounts().await
            }
        }
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        if let Some(signer) = self.signer {
            return Ok(vec![signer]);
        }
        Ok(self.provider.get_accounts().await?)
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        Ok(self.provider.call(tx).await?)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        Ok(self.provider.get_transaction_receipt(hash).await?)
    }

    async fn subscribe(&self, filter: Filter) -> Result<LogSubscription> {
        let poller = self.provider.watch_logs(&filter).await?.with_poll_interval(self.poll_interval);
        let id = SubscriptionId::new(Uuid::new_v4().to_string());
        let (tx, logs) = mpsc::unbounded_channel();

        let mut stream = poller.into_stream();
        let task = tokio::spawn(async move {
            loop {
                let batch = tokio::select! {
                    _ = tx.closed() => return,
                    batch = stream.next() => batch,
                };
                let Some(batch) = batch else { return };
                for log in batch {
                    if tx.send(log).is_err() {
                        return;
                    }
                }
            }
        });
        let mut subscriptions = self.subscriptions.lock();
        subscriptions.retain(|_, task| !task.is_finished());
        subscriptions.insert(id.clone(), task);
        drop(subscriptions);
        debug!(target: "portal::rpc", %id, "installed log filter");

        Ok(LogSubscription { id, logs })
    }

    async fn unsubscribe(&self, id: &SubscriptionId) -> Result<()> {
        let task = self
            .subscriptions
            .lock()
            .remove(id)
            .ok_or_else(|| PortalError::UnknownSubscription(id.to_string()))?;
        task.abort();
        Ok(())
    }
}

impl Drop for RpcWallet {
    fn drop(&mut self) {
        for (_, task) in self.subscriptions.get_mut().drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_local_shorthand() {
        assert_eq!(normalize_url("localhost:8545").unwrap().as_str(), "http://localhost:8545/");
        assert_eq!(normalize_url(" 127.0.0.1:8545").unwrap().as_str(), "http://127.0.0.1:8545/");
        assert_eq!(
            normalize_url("https://rpc.example.org/v1").unwrap().as_str(),
            "https://rpc.example.org/v1"
        );
        assert!(normalize_url("not a url").is_err());
    }

    #[tokio::test]
    async fn signer_is_the_only_account() {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        let wallet = RpcWallet::connect("http://localhost:8545", Some(signer)).unwrap();

        assert_eq!(wallet.accounts().await.unwrap(), [address]);
        assert_eq!(wallet.request_accounts().await.unwrap(), [address]);
    }

    #[tokio::test]
    async fn unknown_subscription() {
        let wallet = RpcWallet::connect("http://localhost:8545", None).unwrap();
        let err = wallet.unsubscribe(&SubscriptionId::new("0x1")).await.unwrap_err();
        assert!(matches!(err, PortalError::UnknownSubscription(id) if id == "0x1"));
    }
}
