use std::{str::FromStr, sync::Arc};

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use eyre::{Result, WrapErr, bail};
use figment::providers::Serialized;
use serde::Serialize;
use wave_portal::{PortalConfig, RpcWallet, WalletProvider};
use wave_portal_browser::BrowserWalletServer;
use yansi::Paint;

/// Options shared by every command. Flags that are set override `waveportal.toml` and `WAVE_*`
/// environment variables.
#[derive(Clone, Debug, Default, Serialize, Parser)]
pub struct PortalOpts {
    /// The RPC endpoint.
    #[arg(long, short, global = true, env = "ETH_RPC_URL", value_name = "URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Address of the WavePortal contract.
    #[arg(long, global = true, value_name = "ADDRESS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Address>,

    /// Gas limit of `wave` transactions.
    #[arg(long, global = true, value_name = "GAS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,

    /// Sign transactions with this private key instead of using the node's accounts.
    #[arg(
        long,
        global = true,
        env = "WAVE_PRIVATE_KEY",
        hide_env_values = true,
        value_name = "RAW_PRIVATE_KEY"
    )]
    #[serde(skip)]
    pub private_key: Option<String>,

    /// Use the wallet of a browser page instead of the RPC endpoint.
    #[arg(long, global = true, conflicts_with = "private_key")]
    #[serde(skip)]
    pub browser: bool,

    /// Port of the browser wallet bridge.
    #[arg(long, global = true, value_name = "PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_port: Option<u16>,
}

impl PortalOpts {
    /// Defaults, config file and environment, with these flags on top.
    pub fn load_config(&self) -> Result<PortalConfig> {
        PortalConfig::load_with(Serialized::defaults(self)).wrap_err("failed to load config")
    }

    pub fn signer(&self) -> Result<Option<PrivateKeySigner>> {
        self.private_key
            .as_deref()
            .map(|key| PrivateKeySigner::from_str(key.trim()).wrap_err("invalid private key"))
            .transpose()
    }

    /// Opens the wallet the commands run against.
    ///
    /// With `--browser` this starts the bridge and waits until a page has loaded and reported a
    /// wallet.
    pub async fn wallet(&self, config: &PortalConfig) -> Result<Wallet> {
        if !self.browser {
            let wallet = RpcWallet::connect(&config.rpc_url, self.signer()?)?
                .with_poll_interval(config.poll_interval());
            return Ok(Wallet { provider: Arc::new(wallet), server: None });
        }

        let mut server = BrowserWalletServer::new(config.browser_port, config.browser_timeout());
        server.start().await?;
        eprintln!("Open {} in a browser with your wallet installed.", server.url().cyan());

        let wallet = server.wallet();
        let Some(status) = wallet.wait_for_page(config.browser_timeout()).await else {
            server.stop().await?;
            bail!("browser page did not load within {:?}", config.browser_timeout());
        };
        debug!(?status, "browser page loaded");

        Ok(Wallet { provider: Arc::new(wallet), server: Some(server) })
    }
}

/// The active wallet, plus the bridge serving it when it lives in a browser.
#[derive(Debug)]
pub struct Wallet {
    pub provider: Arc<dyn WalletProvider>,
    server: Option<BrowserWalletServer>,
}

impl Wallet {
    /// Stops the bridge, if any.
    pub async fn close(self) -> Result<()> {
        if let Some(mut server) = self.server {
            server.stop().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use wave_portal::config::CONFIG_FILE;

    #[test]
    fn unset_flags_keep_config() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "gas_limit = 500000")?;
            jail.set_env("WAVE_RPC_URL", "http://node:8545");

            let config = PortalOpts::default().load_config().map_err(|e| e.to_string())?;
            assert_eq!(config.gas_limit, 500_000);
            assert_eq!(config.rpc_url, "http://node:8545");
            Ok(())
        });
    }

    #[test]
    fn flags_override_config() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "gas_limit = 500000")?;
            jail.set_env("WAVE_BROWSER_PORT", "1000");

            let opts = PortalOpts::parse_from([
                "wave",
                "--gas-limit",
                "42",
                "--contract",
                "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "--browser-port",
                "2000",
                "--rpc-url",
                "http://localhost:9999",
            ]);
            let config = opts.load_config().map_err(|e| e.to_string())?;
            assert_eq!(config.gas_limit, 42);
            assert_eq!(config.contract, address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
            assert_eq!(config.browser_port, 2000);
            assert_eq!(config.rpc_url, "http://localhost:9999");
            Ok(())
        });
    }

    #[test]
    fn parses_private_key() {
        let opts = PortalOpts {
            private_key: Some(
                "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
            ),
            ..Default::default()
        };
        let signer = opts.signer().unwrap().unwrap();
        assert_eq!(signer.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));

        let opts = PortalOpts { private_key: Some("nope".to_string()), ..Default::default() };
        assert!(opts.signer().is_err());
    }

    #[test]
    fn browser_conflicts_with_private_key() {
        let res = PortalOpts::try_parse_from(["wave", "--browser", "--private-key", "0x01"]);
        assert!(res.is_err());
    }
}
