//! # wave-portal-browser
//!
//! Browser wallet bridge for the Wave Portal.
//!
//! A local HTTP server serves a page that talks to the injected wallet (`window.ethereum`,
//! [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193)):
//! 1. The page reports whether a wallet is installed.
//! 2. Wallet calls made through [`BrowserWallet`] are queued on the server.
//! 3. The page polls the queue, forwards each call to the wallet and posts the answer back.
//! 4. Log subscription messages emitted by the wallet are posted back as they arrive.
//!
//! With [`BrowserWalletServer::with_app`] the same page also renders the portal itself.

#[macro_use]
extern crate tracing;

mod app;
mod error;
mod handlers;
mod queue;
mod router;
mod server;
mod state;
mod wallet;

pub mod types;

pub use app::{AlertQueue, PortalApp};
pub use error::BrowserWalletError;
pub use server::BrowserWalletServer;
pub use wallet::BrowserWallet;
