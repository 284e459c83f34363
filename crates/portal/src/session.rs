//! The wallet session behind the portal page.
//!
//! [`WaveSession`] owns the view state (active account, wave list, draft message) and drives it
//! through an injected [`WalletProvider`]. The public operations keep the page's failure model:
//! they log and carry on, and the only failure the user is shown is the missing-wallet alert. The
//! `try_*` variants return the error instead.

use crate::{
    PortalError, Result,
    contract::WavePortal,
    provider::{SubscriptionId, WalletProvider, wait_for_receipt},
    wave::{Wave, WaveList},
};
use alloy_primitives::{Address, U256};
use alloy_rpc_types::TransactionReceipt;
use parking_lot::RwLock;
use serde::Serialize;
use std::{fmt, sync::Arc, time::Duration};
use tokio::task::JoinHandle;

/// Shown when the user tries to connect without any wallet installed.
pub const NO_WALLET_ALERT: &str = "Get MetaMask!";

/// Surfaces blocking messages to the user.
pub trait Notifier: fmt::Debug + Send + Sync {
    fn alert(&self, message: &str);
}

/// A [`Notifier`] that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(target: "portal::session", "{message}");
    }
}

/// How long to wait for a submitted wave to be mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for Confirmation {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(1), timeout: Duration::from_secs(120) }
    }
}

/// Point-in-time copy of the view state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub account: Option<Address>,
    pub waves: WaveList,
    pub draft: String,
}

#[derive(Debug)]
pub struct WaveSession {
    provider: Arc<dyn WalletProvider>,
    portal: WavePortal,
    notifier: Arc<dyn Notifier>,
    confirmation: Confirmation,
    account: RwLock<Option<Address>>,
    waves: Arc<RwLock<WaveState>>,
    draft: RwLock<String>,
}

impl WaveSession {
    pub fn new(provider: Arc<dyn WalletProvider>, portal: WavePortal) -> Self {
        Self {
            provider,
            portal,
            notifier: Arc::new(LogNotifier),
            confirmation: Confirmation::default(),
            account: RwLock::new(None),
            waves: Arc::default(),
            draft: RwLock::new(String::new()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn portal(&self) -> &WavePortal {
        &self.portal
    }

    pub fn account(&self) -> Option<Address> {
        *self.account.read()
    }

    pub fn waves(&self) -> WaveList {
        self.waves.read().list.clone()
    }

    pub fn draft(&self) -> String {
        self.draft.read().clone()
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        *self.draft.write() = draft.into();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { account: self.account(), waves: self.waves(), draft: self.draft() }
    }

    /// Picks up an account the wallet already authorized, without prompting, then loads the
    /// wave list.
    pub async fn check_connection(&self) -> Option<Address> {
        if !self.provider.is_available() {
            info!(target: "portal::session", "no wallet provider detected");
            return None;
        }
        debug!(target: "portal::session", provider = ?self.provider, "found wallet provider");

        match self.provider.accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(&account) => {
                    info!(target: "portal::session", %account, "found an authorized account");
                    *self.account.write() = Some(account);
                }
                None => info!(target: "portal::session", "no authorized account found"),
            },
            Err(err) => {
                warn!(target: "portal::session", %err, "failed to query authorized accounts");
                return None;
            }
        }

        self.fetch_all_waves().await;
        self.account()
    }

    /// Asks the wallet to authorize an account.
    ///
    /// Without a wallet the user is alerted and the account is left untouched.
    pub async fn connect(&self) -> Option<Address> {
        match self.try_connect().await {
            Ok(account) => Some(account),
            Err(PortalError::NoProvider) => {
                self.notifier.alert(NO_WALLET_ALERT);
                None
            }
            Err(err) => {
                warn!(target: "portal::session", %err, "failed to connect wallet");
                None
            }
        }
    }

    pub async fn try_connect(&self) -> Result<Address> {
        if !self.provider.is_available() {
            return Err(PortalError::NoProvider);
        }
        let accounts = self.provider.request_accounts().await?;
        let account = *accounts.first().ok_or(PortalError::NoAccounts)?;
        info!(target: "portal::session", %account, "connected");
        *self.account.write() = Some(account);
        Ok(account)
    }

    /// Replaces the wave list with the contract's full history. On failure the previous list is
    /// kept.
    pub async fn fetch_all_waves(&self) -> usize {
        match self.try_fetch_all_waves().await {
            Ok(count) => count,
            Err(err) => {
                warn!(target: "portal::session", %err, "failed to fetch waves");
                self.waves.read().list.len()
            }
        }
    }

    pub async fn try_fetch_all_waves(&self) -> Result<usize> {
        if !self.provider.is_available() {
            return Err(PortalError::NoProvider);
        }
        let fetch = Fetch::start(&self.waves);
        let waves = self.portal.all_waves(self.provider.as_ref()).await?;
        let fetched = waves.len();
        let count = fetch.finish(waves);
        debug!(target: "portal::session", fetched, count, "fetched waves");
        Ok(count)
    }

    /// Sends `message` as a wave from the active account and waits for it to be mined.
    ///
    /// The wave list is left alone; the new wave shows up through the live subscription. The
    /// draft is cleared once the wave is mined.
    pub async fn submit_wave(&self, message: &str) -> Option<TransactionReceipt> {
        match self.try_submit_wave(message).await {
            Ok((receipt, _)) => Some(receipt),
            Err(err) => {
                warn!(target: "portal::session", %err, "failed to submit wave");
                None
            }
        }
    }

    /// Submits the current draft.
    pub async fn submit_draft(&self) -> Option<TransactionReceipt> {
        let draft = self.draft();
        self.submit_wave(&draft).await
    }

    /// Like [`submit_wave`](Self::submit_wave) but returns the error, along with the wave total
    /// read after mining.
    pub async fn try_submit_wave(&self, message: &str) -> Result<(TransactionReceipt, U256)> {
        if !self.provider.is_available() {
            return Err(PortalError::NoProvider);
        }
        let from = self.account().ok_or(PortalError::NoAccount)?;

        let hash = self.portal.wave(self.provider.as_ref(), from, message).await?;
        info!(target: "portal::session", %hash, "mining");

        let Confirmation { poll_interval, timeout } = self.confirmation;
        let receipt = wait_for_receipt(self.provider.as_ref(), hash, poll_interval, timeout).await?;
        info!(target: "portal::session", %hash, "mined");

        {
            let mut draft = self.draft.write();
            if *draft == message {
                draft.clear();
            }
        }

        let total = self.portal.total_waves(self.provider.as_ref()).await?;
        info!(target: "portal::session", %total, "retrieved total wave count");
        Ok((receipt, total))
    }

    /// Starts appending `NewWave` events to the wave list.
    ///
    /// Returns `None` if there is no wallet or the subscription could not be set up.
    pub async fn subscribe_to_new_waves(&self) -> Option<WaveSubscription> {
        match self.try_subscribe_to_new_waves().await {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                warn!(target: "portal::session", %err, "failed to subscribe to new waves");
                None
            }
        }
    }

    pub async fn try_subscribe_to_new_waves(&self) -> Result<WaveSubscription> {
        if !self.provider.is_available() {
            return Err(PortalError::NoProvider);
        }
        let mut subscription = self.provider.subscribe(self.portal.new_wave_filter()).await?;
        let id = subscription.id.clone();
        debug!(target: "portal::session", %id, "subscribed to NewWave");

        let waves = Arc::clone(&self.waves);
        let task = tokio::spawn(async move {
            while let Some(log) = subscription.logs.recv().await {
                match WavePortal::decode_new_wave(&log) {
                    Ok(wave) => append_wave(&waves, wave),
                    Err(err) => warn!(target: "portal::session", %err, "skipping undecodable log"),
                }
            }
            trace!(target: "portal::session", id = %subscription.id, "subscription closed");
        });

        Ok(WaveSubscription { id, provider: Arc::clone(&self.provider), task: Some(task) })
    }
}

fn append_wave(waves: &RwLock<WaveState>, wave: Wave) {
    info!(target: "portal::session", from = %wave.address, message = %wave.message, "NewWave");
    if !waves.write().append(wave) {
        debug!(target: "portal::session", "wave already listed");
    }
}

/// The wave list plus the live events seen while a fetch is in flight.
#[derive(Debug, Default)]
struct WaveState {
    list: WaveList,
    fetching: usize,
    /// Appended since the oldest in-flight fetch started; re-applied on top of its result.
    live: Vec<Wave>,
}

impl WaveState {
    fn append(&mut self, wave: Wave) -> bool {
        if self.fetching > 0 {
            self.live.push(wave.clone());
        }
        self.list.push(wave)
    }

    fn end_fetch(&mut self, fetched: Option<WaveList>) {
        if let Some(fetched) = fetched {
            self.list.replace(fetched);
            for wave in &self.live {
                self.list.push(wave.clone());
            }
        }
        self.fetching = self.fetching.saturating_sub(1);
        if self.fetching == 0 {
            self.live.clear();
        }
    }
}

/// Marks a fetch as in flight until it is finished or dropped.
struct Fetch<'a>(Option<&'a RwLock<WaveState>>);

impl<'a> Fetch<'a> {
    fn start(state: &'a RwLock<WaveState>) -> Self {
        state.write().fetching += 1;
        Self(Some(state))
    }

    /// Installs `waves` and returns the resulting list length.
    fn finish(mut self, waves: WaveList) -> usize {
        let Some(state) = self.0.take() else { return 0 };
        let mut state = state.write();
        state.end_fetch(Some(waves));
        state.list.len()
    }
}

impl Drop for Fetch<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.0.take() {
            state.write().end_fetch(None);
        }
    }
}

/// Handle to a live `NewWave` subscription. Dropping it stops appending events; call
/// [`unsubscribe`](Self::unsubscribe) to also release the subscription on the provider.
#[derive(Debug)]
pub struct WaveSubscription {
    id: SubscriptionId,
    provider: Arc<dyn WalletProvider>,
    task: Option<JoinHandle<()>>,
}

impl WaveSubscription {
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub async fn unsubscribe(mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.provider.unsubscribe(&self.id).await?;
        debug!(target: "portal::session", id = %self.id, "unsubscribed from NewWave");
        Ok(())
    }
}

impl Drop for WaveSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
