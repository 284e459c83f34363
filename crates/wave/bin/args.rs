use crate::cmd::{app::AppArgs, send::SendArgs};
use clap::{Parser, Subcommand};
use wave_cli::opts::PortalOpts;

/// Wave at the WavePortal from your terminal.
#[derive(Parser)]
#[command(name = "wave", version, next_display_order = None)]
pub struct Wave {
    #[command(flatten)]
    pub opts: PortalOpts,

    #[command(subcommand)]
    pub cmd: WaveSubcommand,
}

#[derive(Subcommand)]
pub enum WaveSubcommand {
    /// Prints the accounts the wallet has already authorized.
    Accounts,

    /// Asks the wallet to authorize an account.
    Connect,

    /// Prints every wave stored by the contract.
    #[command(visible_alias = "ls")]
    List {
        /// Print the waves as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Prints the total number of waves.
    Total,

    /// Sends a wave and waits for it to be mined.
    Send(SendArgs),

    /// Prints the wave list, then follows new waves until interrupted.
    Watch,

    /// Serves the portal page for a browser wallet.
    App(AppArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Wave::command().debug_assert();
    }

    #[test]
    fn global_opts_after_subcommand() {
        let args = Wave::parse_from(["wave", "send", "hello there", "--gas-limit", "1"]);
        assert_eq!(args.opts.gas_limit, Some(1));
        let WaveSubcommand::Send(send) = args.cmd else { panic!("expected send") };
        assert_eq!(send.message, "hello there");
    }

    #[test]
    fn app_overrides() {
        let args = Wave::parse_from(["wave", "app", "--port", "0", "--timeout", "5"]);
        let WaveSubcommand::App(app) = args.cmd else { panic!("expected app") };
        assert_eq!(app.port, Some(0));
        assert_eq!(app.timeout, Some(5));
    }
}
