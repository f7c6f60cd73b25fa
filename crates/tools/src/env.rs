//! Environment snapshot
//!
//! Resolution never reads the process environment directly. Instead the
//! variables it consumes are captured once into an [`EnvSnapshot`], which is
//! then handed to [`crate::config::resolve`]. Tests build snapshots by hand.
//!
//! Capture order follows the usual `.env` convention:
//!
//! 1. Values from the `.env` file (if any)
//! 2. Values from the real process environment, which win on conflict

use std::collections::BTreeMap;
use std::env::VarError;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;

/// Signing mnemonic for the production network.
pub const MNEMONIC: &str = "MNEMONIC";
/// Block explorer API key used for contract verification.
pub const SNOWTRACE_API_KEY: &str = "SNOWTRACE_API_KEY";
/// Enables forking of the simulated network when exactly `"1"`.
pub const USE_LOCAL_TESTNET: &str = "USE_LOCAL_TESTNET";

/// Every variable the resolver looks at.
pub const CONSUMED_VARS: [&str; 3] = [MNEMONIC, SNOWTRACE_API_KEY, USE_LOCAL_TESTNET];

/// Immutable mapping of environment variable names to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and callers assembling
    /// a snapshot by hand.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Read the consumed variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvVar` if a consumed variable is set but is
    /// not valid Unicode.
    pub fn from_process() -> Result<Self, ConfigError> {
        let mut snapshot = Self::new();
        for name in CONSUMED_VARS {
            match std::env::var(name) {
                Ok(value) => {
                    snapshot.vars.insert(name.to_string(), value);
                }
                Err(VarError::NotPresent) => {}
                Err(source) => {
                    return Err(ConfigError::EnvVar {
                        name: name.to_string(),
                        source,
                    })
                }
            }
        }
        Ok(snapshot)
    }

    /// Parse a `.env` file without touching the process environment.
    pub fn from_dotenv_file(path: &Path) -> Result<Self, ConfigError> {
        let iter = dotenvy::from_path_iter(path)?;
        Self::from_dotenv_iter(iter)
    }

    fn from_dotenv_iter<I>(iter: I) -> Result<Self, ConfigError>
    where
        I: Iterator<Item = dotenvy::Result<(String, String)>>,
    {
        let mut snapshot = Self::new();
        for item in iter {
            let (key, value) = item?;
            if CONSUMED_VARS.contains(&key.as_str()) {
                snapshot.vars.insert(key, value);
            }
        }
        Ok(snapshot)
    }

    /// Capture `.env` values overlaid with the process environment.
    ///
    /// With `dotenv_path = None` a `.env` file in the working directory (or
    /// a parent) is used if one exists; its absence is not an error. An
    /// explicitly named file must exist.
    pub fn capture(dotenv_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut snapshot = match dotenv_path {
            Some(path) => Self::from_dotenv_file(path)?,
            None => match dotenvy::dotenv_iter() {
                Ok(iter) => Self::from_dotenv_iter(iter)?,
                Err(e) if e.not_found() => Self::new(),
                Err(e) => return Err(e.into()),
            },
        };
        debug!(count = snapshot.len(), "loaded .env values");

        snapshot.overlay(Self::from_process()?);
        Ok(snapshot)
    }

    /// Entries in `other` replace entries with the same name.
    pub fn overlay(&mut self, other: EnvSnapshot) {
        self.vars.extend(other.vars);
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
