use clap::Parser;
use eyre::Result;
use wave_portal::WaveSession;

/// CLI arguments for `wave send`.
#[derive(Debug, Parser)]
pub struct SendArgs {
    /// The message to wave with.
    pub message: String,
}

impl SendArgs {
    pub async fn run(self, session: &WaveSession) -> Result<()> {
        let Some(account) = super::connect(session).await? else {
            return Ok(());
        };
        debug!(%account, "sending wave");

        eprintln!("Mining...");
        let (receipt, total) = session.try_submit_wave(&self.message).await?;

        println!("Mined -- {}", receipt.transaction_hash);
        println!("Retrieved total wave count... {total}");
        Ok(())
    }
}
