//! logrecycler library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `logrecycler` is used as a binary (main.rs).

pub mod cli;
pub mod logging;
pub mod metrics_server;
pub mod runner;
pub mod sinks;
