use std::sync::Arc;

use alloy_primitives::Address;
use eyre::Result;
use wave_cli::{opts::Wallet, utils::TerminalNotifier};
use wave_portal::{Notifier, PortalConfig, PortalError, WaveSession, session::NO_WALLET_ALERT};

pub mod app;
pub mod send;
pub mod watch;

/// A session over `wallet` that reports alerts on the terminal.
pub fn session(wallet: &Wallet, config: &PortalConfig) -> WaveSession {
    WaveSession::new(Arc::clone(&wallet.provider), config.portal())
        .with_notifier(Arc::new(TerminalNotifier))
        .with_confirmation(config.confirmation())
}

/// Asks the wallet for an account. Returns `None` after alerting when there is no wallet.
pub async fn connect(session: &WaveSession) -> Result<Option<Address>> {
    match session.try_connect().await {
        Ok(account) => Ok(Some(account)),
        Err(PortalError::NoProvider) => {
            TerminalNotifier.alert(NO_WALLET_ALERT);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
