use eyre::Result;
use wave_portal::{PortalConfig, WaveSession, view::waves_table};

/// Prints the current waves, then every new one until ctrl-c.
pub async fn run(session: &WaveSession, config: &PortalConfig) -> Result<()> {
    // Subscribe before fetching so no wave mined in between is missed.
    let subscription = session.try_subscribe_to_new_waves().await?;
    session.try_fetch_all_waves().await?;

    let waves = session.waves();
    if !waves.is_empty() {
        println!("{}", waves_table(&waves));
    }
    let mut seen = waves.len();
    eprintln!("Watching for new waves, press ctrl-c to stop.");

    let mut interval = tokio::time::interval(config.poll_interval());
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                break;
            }
            _ = interval.tick() => {
                let waves = session.waves();
                for wave in waves.iter().skip(seen) {
                    println!("{wave}");
                }
                seen = waves.len();
            }
        }
    }

    if let Err(err) = subscription.unsubscribe().await {
        debug!(%err, "failed to unsubscribe");
    }
    Ok(())
}
