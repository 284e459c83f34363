#[macro_use]
extern crate tracing;

use args::{Wave, WaveSubcommand};
use clap::Parser;
use eyre::{Result, bail};
use wave_cli::{handler, opts::Wallet, utils};
use wave_portal::{PortalConfig, view::waves_table};

pub mod args;
pub mod cmd;

fn main() -> Result<()> {
    handler::install();
    utils::load_dotenv();
    utils::subscriber();
    let args = Wave::parse();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Wave) -> Result<()> {
    let config = args.opts.load_config()?;
    debug!(?config, "loaded config");

    match args.cmd {
        WaveSubcommand::App(cmd) => cmd.run(config).await,
        cmd => {
            let wallet = args.opts.wallet(&config).await?;
            let res = run(cmd, &wallet, &config).await;
            wallet.close().await?;
            res
        }
    }
}

async fn run(cmd: WaveSubcommand, wallet: &Wallet, config: &PortalConfig) -> Result<()> {
    let session = cmd::session(wallet, config);
    match cmd {
        WaveSubcommand::Accounts => {
            let accounts = wallet.provider.accounts().await?;
            if accounts.is_empty() {
                eprintln!("No authorized account found.");
            }
            for account in accounts {
                println!("{account}");
            }
        }
        WaveSubcommand::Connect => {
            if let Some(account) = cmd::connect(&session).await? {
                println!("Wallet Connected! {account}");
            }
        }
        WaveSubcommand::List { json } => {
            session.try_fetch_all_waves().await?;
            let waves = session.waves();
            if json {
                println!("{}", serde_json::to_string_pretty(&waves)?);
            } else if waves.is_empty() {
                eprintln!("No waves yet.");
            } else {
                println!("{}", waves_table(&waves));
            }
        }
        WaveSubcommand::Total => {
            let total = session.portal().total_waves(wallet.provider.as_ref()).await?;
            println!("{total}");
        }
        WaveSubcommand::Send(cmd) => cmd.run(&session).await?,
        WaveSubcommand::Watch => cmd::watch::run(&session, config).await?,
        WaveSubcommand::App(_) => bail!("`wave app` runs its own wallet bridge"),
    }
    Ok(())
}
