//! The Wave Portal page served on top of the wallet bridge.

use std::sync::Arc;

use handlebars::Handlebars;
use parking_lot::Mutex;
use serde_json::json;
use wave_portal::{
    Notifier, PortalConfig, Result, Snapshot, WaveSession, WaveSubscription,
    view::{BIO, STYLESHEET, render_composer, render_header, render_nav, render_waves},
};

use crate::{BrowserWallet, types::ViewResponse};

const INDEX_HTML: &str = include_str!("assets/index.html");
const MAIN_JS: &str = include_str!("assets/main.js");

/// Alerts raised by the session, held until the page picks them up.
#[derive(Debug, Default)]
pub struct AlertQueue(Mutex<Vec<String>>);

impl AlertQueue {
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }
}

impl Notifier for AlertQueue {
    fn alert(&self, message: &str) {
        self.0.lock().push(message.to_string());
    }
}

/// Session state behind the page.
#[derive(Debug)]
pub struct PortalApp {
    session: Arc<WaveSession>,
    wallet: BrowserWallet,
    alerts: Arc<AlertQueue>,
    subscription: tokio::sync::Mutex<Option<WaveSubscription>>,
}

impl PortalApp {
    pub fn new(wallet: BrowserWallet, config: &PortalConfig) -> Self {
        let alerts = Arc::new(AlertQueue::default());
        let session = WaveSession::new(Arc::new(wallet.clone()), config.portal())
            .with_notifier(alerts.clone())
            .with_confirmation(config.confirmation());
        Self { session: Arc::new(session), wallet, alerts, subscription: Default::default() }
    }

    pub fn session(&self) -> &Arc<WaveSession> {
        &self.session
    }

    /// Runs when the page reports a wallet: follow new waves, then pick up an existing
    /// authorization and load the list.
    pub(crate) async fn mount(&self) {
        let subscription = self.session.subscribe_to_new_waves().await;
        let previous = std::mem::replace(&mut *self.subscription.lock().await, subscription);
        if let Some(previous) = previous
            && let Err(err) = previous.unsubscribe().await
        {
            debug!(target: "browser_wallet::app", %err, "failed to release old subscription");
        }
        self.session.check_connection().await;
    }

    /// Runs when the page loses its wallet or the server stops. The wallet side of the
    /// subscription is already gone, so it is only released here.
    pub(crate) async fn unmount(&self) {
        if let Some(subscription) = self.subscription.lock().await.take() {
            let released = self.wallet.release(subscription.id());
            debug!(
                target: "browser_wallet::app",
                id = %subscription.id(),
                released,
                "dropping subscription"
            );
        }
    }

    pub(crate) fn view(&self) -> Result<ViewResponse> {
        let snapshot = self.session.snapshot();
        Ok(ViewResponse {
            connected: snapshot.account.is_some(),
            nav: render_nav(snapshot.account)?,
            composer: render_composer(&snapshot)?,
            waves: render_waves(&snapshot.waves)?,
            alerts: self.alerts.drain(),
        })
    }
}

/// Renders the full page. Without an app only the wallet relay runs.
pub(crate) fn render_index(token: &str, app: Option<&PortalApp>) -> Result<String> {
    let (nav, bio, composer, waves, connected) = match app {
        Some(app) => {
            let snapshot: Snapshot = app.session.snapshot();
            (
                render_nav(snapshot.account)?,
                BIO,
                render_composer(&snapshot)?,
                render_waves(&snapshot.waves)?,
                snapshot.account.is_some(),
            )
        }
        None => (
            render_header(),
            "Wallet bridge active, keep this tab open.",
            String::new(),
            String::new(),
            false,
        ),
    };
    let data = json!({
        "stylesheet": STYLESHEET,
        "token": token,
        "connected": connected,
        "app": app.is_some(),
        "nav": nav,
        "bio": bio,
        "composer": composer,
        "waves": waves,
        "script": MAIN_JS,
    });
    Ok(Handlebars::new().render_template(INDEX_HTML, &data)?)
}
