use std::time::Duration;

use clap::Parser;
use eyre::Result;
use wave_portal::PortalConfig;
use wave_portal_browser::BrowserWalletServer;
use yansi::Paint;

/// CLI arguments for `wave app`.
#[derive(Debug, Parser)]
pub struct AppArgs {
    /// Port to serve the page on. Defaults to `browser_port` from the config.
    #[arg(long)]
    pub port: Option<u16>,

    /// Seconds to wait for the browser wallet to answer a request.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl AppArgs {
    pub async fn run(self, config: PortalConfig) -> Result<()> {
        let port = self.port.unwrap_or(config.browser_port);
        let timeout = self.timeout.map_or_else(|| config.browser_timeout(), Duration::from_secs);

        let mut server = BrowserWalletServer::new(port, timeout).with_app(&config);
        server.start().await?;
        println!("Wave Portal running at {}", server.url().cyan());
        eprintln!("Press ctrl-c to stop.");

        tokio::signal::ctrl_c().await?;
        server.stop().await?;
        Ok(())
    }
}
