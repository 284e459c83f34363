//! Portal configuration.
//!
//! Values are layered with `figment`: built-in defaults, then `waveportal.toml` in the working
//! directory, then `WAVE_*` environment variables. Command line flags are merged on top by the
//! binary.

use crate::{
    contract::{DEFAULT_GAS_LIMIT, WAVE_PORTAL_ADDRESS, WavePortal},
    session::Confirmation,
};
use alloy_primitives::Address;
use figment::{
    Figment, Provider,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// File name of the optional config file.
pub const CONFIG_FILE: &str = "waveportal.toml";

/// Prefix of the environment variables overriding config values.
pub const ENV_PREFIX: &str = "WAVE_";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Address of the WavePortal deployment.
    pub contract: Address,
    /// JSON-RPC endpoint used when not going through the browser wallet.
    pub rpc_url: String,
    /// Gas ceiling for `wave` transactions.
    pub gas_limit: u64,
    /// Interval between receipt and log polls.
    pub poll_interval_ms: u64,
    /// How long to wait for a submitted wave to be mined.
    pub confirmation_timeout_secs: u64,
    /// Port of the local browser wallet bridge.
    pub browser_port: u16,
    /// How long to wait for the browser wallet to answer a request.
    pub browser_timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            contract: WAVE_PORTAL_ADDRESS,
            rpc_url: "http://localhost:8545".to_string(),
            gas_limit: DEFAULT_GAS_LIMIT,
            poll_interval_ms: 1_000,
            confirmation_timeout_secs: 120,
            browser_port: 9545,
            browser_timeout_secs: 300,
        }
    }
}

impl PortalConfig {
    /// Loads the config from the default figment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Loads the config from the default figment with `provider` merged on top.
    pub fn load_with<P: Provider>(provider: P) -> Result<Self, figment::Error> {
        Self::figment().merge(provider).extract()
    }

    /// Defaults, then [`CONFIG_FILE`], then `WAVE_*` env vars.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn portal(&self) -> WavePortal {
        WavePortal::new(self.contract).with_gas_limit(self.gas_limit)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation(&self) -> Confirmation {
        Confirmation {
            poll_interval: self.poll_interval(),
            timeout: Duration::from_secs(self.confirmation_timeout_secs),
        }
    }

    pub fn browser_timeout(&self) -> Duration {
        Duration::from_secs(self.browser_timeout_secs)
    }
}
