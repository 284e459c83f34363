use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use alloy_rpc_types::Log;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    error::BrowserWalletError,
    queue::RequestQueue,
    types::{ProviderStatus, SubscriptionMessage, WalletRequest, WalletResponse},
};

/// How often a waiting requester checks for its answer.
const RESPONSE_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub(crate) struct BrowserWalletState {
    /// What the page reported about `window.ethereum`, if it reported yet.
    status: Mutex<Option<ProviderStatus>>,
    /// Request/response queue for wallet calls.
    requests: Mutex<RequestQueue>,
    /// Log subscriptions by the id the wallet assigned.
    subscriptions: Mutex<HashMap<String, mpsc::UnboundedSender<Log>>>,
    /// Token the page must echo in `X-Session-Token`.
    session_token: Arc<String>,
}

impl Default for BrowserWalletState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserWalletState {
    pub(crate) fn new() -> Self {
        Self {
            status: Mutex::new(None),
            requests: Mutex::new(RequestQueue::new()),
            subscriptions: Mutex::default(),
            session_token: Arc::new(Uuid::new_v4().to_string()),
        }
    }

    pub(crate) fn session_token(&self) -> Arc<String> {
        Arc::clone(&self.session_token)
    }

    pub(crate) fn provider_status(&self) -> Option<ProviderStatus> {
        *self.status.lock()
    }

    /// Records the page's report, returning the previous one.
    pub(crate) fn set_provider_status(&self, status: ProviderStatus) -> Option<ProviderStatus> {
        self.status.lock().replace(status)
    }

    pub(crate) fn is_available(&self) -> bool {
        self.provider_status().is_some_and(|status| status.available)
    }

    pub(crate) fn read_next_request(&self) -> Option<WalletRequest> {
        self.requests.lock().read_request().cloned()
    }

    /// Stores the page's answer. Returns `false` if nobody is waiting for it.
    pub(crate) fn add_response(&self, response: WalletResponse) -> bool {
        let mut requests = self.requests.lock();
        if !requests.has_request(&response.id) {
            return false;
        }
        requests.add_response(response);
        true
    }

    /// Queues `method` for the page and waits for the answer.
    pub(crate) async fn request(
        &self,
        method: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, BrowserWalletError> {
        let id = Uuid::new_v4();
        self.requests.lock().add_request(WalletRequest { id, method: method.to_string(), params });
        trace!(target: "browser_wallet", %id, method, "queued wallet request");

        let start = Instant::now();
        loop {
            let response = self.requests.lock().get_response(&id);
            if let Some(response) = response {
                return match response.error {
                    Some(reason) => {
                        Err(BrowserWalletError::Rejected { operation: method.to_string(), reason })
                    }
                    None => Ok(response.result.unwrap_or(Value::Null)),
                };
            }
            if start.elapsed() >= timeout {
                self.requests.lock().remove_request(&id);
                return Err(BrowserWalletError::Timeout { operation: method.to_string(), timeout });
            }
            tokio::time::sleep(RESPONSE_POLL_INTERVAL).await;
        }
    }

    /// Registers a subscriber, pruning those whose receiver is gone.
    pub(crate) fn add_subscription(&self, id: String, sender: mpsc::UnboundedSender<Log>) {
        let mut subscriptions = self.subscriptions.lock();
        subscriptions.retain(|_, sender| !sender.is_closed());
        subscriptions.insert(id, sender);
    }

    pub(crate) fn remove_subscription(&self, id: &str) -> bool {
        self.subscriptions.lock().remove(id).is_some()
    }

    /// Routes a subscription message to its subscriber. Returns `false` for unknown ids.
    pub(crate) fn dispatch(&self, message: SubscriptionMessage) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        let Some(sender) = subscriptions.get(&message.subscription) else {
            return false;
        };
        if sender.send(message.result).is_err() {
            subscriptions.remove(&message.subscription);
        }
        true
    }

    /// Drops all pending requests and subscriptions.
    pub(crate) fn reset(&self) {
        self.requests.lock().clear();
        self.subscriptions.lock().clear();
    }
}
