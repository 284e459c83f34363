use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use wave_portal::PortalConfig;

use crate::{
    BrowserWallet,
    app::PortalApp,
    error::BrowserWalletError,
    router::{ServerState, build_router},
    state::BrowserWalletState,
    types::ProviderStatus,
};

/// Local HTTP server the browser page talks to.
///
/// It always relays wallet requests; with [`with_app`](Self::with_app) it also serves the portal
/// page and drives a [`PortalApp`] from it.
#[derive(Debug)]
pub struct BrowserWalletServer {
    port: u16,
    timeout: Duration,
    state: Arc<BrowserWalletState>,
    app: Option<Arc<PortalApp>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl BrowserWalletServer {
    /// Creates a server for `port` (`0` picks a free one). Wallet requests fail after `timeout`.
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self {
            port,
            timeout,
            state: Arc::new(BrowserWalletState::new()),
            app: None,
            shutdown: None,
            task: None,
        }
    }

    /// Serves the portal page, using the browser wallet as provider.
    pub fn with_app(mut self, config: &PortalConfig) -> Self {
        self.app = Some(Arc::new(PortalApp::new(self.wallet(), config)));
        self
    }

    pub async fn start(&mut self) -> Result<(), BrowserWalletError> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], self.port))).await?;
        self.port = listener.local_addr()?.port();

        let router =
            build_router(ServerState { wallet: Arc::clone(&self.state), app: self.app.clone() });
        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = signal.await;
            });
            if let Err(err) = server.await {
                error!(target: "browser_wallet", %err, "server error");
            }
        });

        self.shutdown = Some(shutdown);
        self.task = Some(task);
        info!(target: "browser_wallet", url = %self.url(), "browser wallet server started");
        Ok(())
    }

    /// Stops serving. Pending wallet requests and subscriptions are dropped.
    pub async fn stop(&mut self) -> Result<(), BrowserWalletError> {
        if let Some(app) = &self.app {
            app.unmount().await;
        }
        self.state.reset();
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        debug!(target: "browser_wallet", "browser wallet server stopped");
        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the page has reported an injected wallet.
    pub fn is_connected(&self) -> bool {
        self.state.is_available()
    }

    pub fn provider_status(&self) -> Option<ProviderStatus> {
        self.state.provider_status()
    }

    /// Token the page must send in `X-Session-Token`.
    pub fn session_token(&self) -> Arc<String> {
        self.state.session_token()
    }

    pub fn app(&self) -> Option<&Arc<PortalApp>> {
        self.app.as_ref()
    }

    /// A [`WalletProvider`](wave_portal::WalletProvider) relaying through the page.
    pub fn wallet(&self) -> BrowserWallet {
        BrowserWallet::new(Arc::clone(&self.state), self.timeout)
    }
}
