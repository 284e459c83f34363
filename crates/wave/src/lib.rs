//! Shared pieces of the `wave` binary: error reporting, process setup and the common options.

#[macro_use]
extern crate tracing;

pub mod handler;
pub mod opts;
pub mod utils;
