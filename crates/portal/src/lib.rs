//! # wave-portal
//!
//! Client for the WavePortal contract: connect a wallet, send short messages ("waves") as
//! transactions, and follow the list of waves stored on chain.
//!
//! The wallet is an injected [`WalletProvider`], so the same [`WaveSession`] runs against a
//! JSON-RPC node ([`RpcWallet`]) or a browser wallet relayed over a local bridge.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod contract;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod view;
pub mod wave;

mod error;
pub use error::{PortalError, Result};

pub use config::PortalConfig;
pub use contract::WavePortal;
pub use provider::{LogSubscription, SubscriptionId, WalletProvider};
pub use rpc::RpcWallet;
pub use session::{Notifier, Snapshot, WaveSession, WaveSubscription};
pub use wave::{Wave, WaveList};

#[cfg(test)]
mod test_utils;
