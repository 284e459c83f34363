use std::path::Path;

use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wave_portal::Notifier;
use yansi::Paint;

/// Loads `.env` from the working directory, if there is one.
pub fn load_dotenv() {
    let path = Path::new(".env");
    if !path.is_file() {
        return;
    }
    if let Err(err) = dotenvy::from_path(path) {
        eprintln!("{}", format!("failed to load {}: {err}", path.display()).yellow());
    }
}

/// Installs the global tracing subscriber, filtered by `RUST_LOG`. Logs go to stderr so that
/// command output stays clean.
pub fn subscriber() {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Prints session alerts to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{}", message.yellow().bold());
    }
}
