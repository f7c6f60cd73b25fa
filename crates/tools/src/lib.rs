//! Avalanche deploy tools library
//!
//! Resolves the network, explorer and compiler configuration used by the
//! contract build and deploy tooling.

pub mod compiler;
pub mod config;
pub mod env;
pub mod error;
pub mod export;
pub mod network;
pub mod secret;

pub use config::{resolve, Configuration, ExplorerCredential};
pub use env::EnvSnapshot;
pub use error::ConfigError;
pub use network::{Network, NetworkProfile};
