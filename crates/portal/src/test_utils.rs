//! In-memory wallet used by the unit tests.

use crate::{
    PortalError, Result,
    contract::{IWavePortal, WAVE_PORTAL_ADDRESS},
    provider::{LogSubscription, SubscriptionId, WalletProvider},
    session::Notifier,
};
use alloy_primitives::{Address, B256, Bytes, TxHash, U256, address, keccak256};
use alloy_rpc_types::{Filter, Log, TransactionReceipt, TransactionRequest};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tokio::sync::mpsc;

pub(crate) const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub(crate) const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

pub(crate) fn record(waver: Address, secs: u64, message: &str) -> IWavePortal::Wave {
    IWavePortal::Wave { waver, message: message.to_string(), timestamp: U256::from(secs) }
}

pub(crate) fn new_wave_log(from: Address, secs: u64, message: &str) -> Log {
    let event =
        IWavePortal::NewWave { from, timestamp: U256::from(secs), message: message.to_string() };
    Log {
        inner: alloy_primitives::Log { address: WAVE_PORTAL_ADDRESS, data: event.encode_log_data() },
        ..Default::default()
    }
}

/// Lets spawned tasks run until they block again.
pub(crate) async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub(crate) fn receipt(hash: TxHash, from: Address, success: bool) -> TransactionReceipt {
    serde_json::from_value(serde_json::json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0x11),
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x1",
        "from": from,
        "to": WAVE_PORTAL_ADDRESS,
        "contractAddress": null
    }))
    .expect("valid receipt")
}

#[derive(Debug)]
pub(crate) struct MockWallet {
    available: bool,
    authorized: Vec<Address>,
    grantable: Vec<Address>,
    waves: Vec<IWavePortal::Wave>,
    total: U256,
    fail_calls: AtomicBool,
    revert: AtomicBool,
    requests: AtomicUsize,
    sent: Mutex<Vec<TransactionRequest>>,
    subscribers: Mutex<HashMap<SubscriptionId, mpsc::UnboundedSender<Log>>>,
    unsubscribed: Mutex<Vec<SubscriptionId>>,
    in_fetch: Mutex<Vec<Log>>,
}

impl MockWallet {
    pub(crate) fn new() -> Self {
        Self {
            available: true,
            authorized: Vec::new(),
            grantable: Vec::new(),
            waves: Vec::new(),
            total: U256::ZERO,
            fail_calls: AtomicBool::new(false),
            revert: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
            sent: Mutex::default(),
            subscribers: Mutex::default(),
            unsubscribed: Mutex::default(),
            in_fetch: Mutex::default(),
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self { available: false, ..Self::new() }
    }

    pub(crate) fn with_authorized(mut self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.authorized = accounts.into_iter().collect();
        self
    }

    pub(crate) fn with_grantable(mut self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.grantable = accounts.into_iter().collect();
        self
    }

    pub(crate) fn with_waves(mut self, waves: impl IntoIterator<Item = IWavePortal::Wave>) -> Self {
        self.waves = waves.into_iter().collect();
        self
    }

    pub(crate) fn with_total(mut self, total: u64) -> Self {
        self.total = U256::from(total);
        self
    }

    pub(crate) fn fail_calls(&self, fail: bool) {
        self.fail_calls.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn revert(&self, revert: bool) {
        self.revert.store(revert, Ordering::SeqCst);
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub(crate) fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().clone()
    }

    pub(crate) fn unsubscribed(&self) -> Vec<SubscriptionId> {
        self.unsubscribed.lock().clone()
    }

    /// Delivers `log` to every open subscription.
    pub(crate) fn emit(&self, log: Log) {
        self.subscribers.lock().retain(|_, tx| tx.send(log.clone()).is_ok());
    }

    /// Queues `log` to be emitted while the next `getAllWaves` call is answered, after its
    /// result was read.
    pub(crate) fn emit_during_fetch(&self, log: Log) {
        self.in_fetch.lock().push(log);
    }

    fn track(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.track();
        Ok(self.grantable.clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        self.track();
        Ok(self.authorized.clone())
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        self.track();
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(PortalError::other("execution reverted"));
        }
        let input = tx.input.input().cloned().unwrap_or_default();
        let out = match input.get(..4) {
            Some(selector) if selector == IWavePortal::getAllWavesCall::SELECTOR => {
                let out = self.waves.abi_encode();
                let logs = std::mem::take(&mut *self.in_fetch.lock());
                if !logs.is_empty() {
                    logs.into_iter().for_each(|log| self.emit(log));
                    settle().await;
                }
                out
            }
            Some(selector) if selector == IWavePortal::getTotalWavesCall::SELECTOR => {
                self.total.abi_encode()
            }
            _ => return Err(PortalError::other("unknown selector")),
        };
        Ok(out.into())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        self.track();
        let mut sent = self.sent.lock();
        sent.push(tx);
        Ok(keccak256(sent.len().to_be_bytes()))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        self.track();
        let from = self.sent.lock().last().and_then(|tx| tx.from).unwrap_or_default();
        Ok(Some(receipt(hash, from, !self.revert.load(Ordering::SeqCst))))
    }

    async fn subscribe(&self, _filter: Filter) -> Result<LogSubscription> {
        self.track();
        let (tx, logs) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.lock();
        let id = SubscriptionId::new(format!("0x{:x}", subscribers.len() + 1));
        subscribers.insert(id.clone(), tx);
        Ok(LogSubscription { id, logs })
    }

    async fn unsubscribe(&self, id: &SubscriptionId) -> Result<()> {
        self.track();
        self.subscribers
            .lock()
            .remove(id)
            .ok_or_else(|| PortalError::UnknownSubscription(id.to_string()))?;
        self.unsubscribed.lock().push(id.clone());
        Ok(())
    }
}

/// Collects alerts instead of showing them.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier(Mutex<Vec<String>>);

impl RecordingNotifier {
    pub(crate) fn alerts(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.0.lock().push(message.to_string());
    }
}
