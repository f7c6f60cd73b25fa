//! Network profiles for the Avalanche C-Chain toolchain
//!
//! Two targets are supported: the in-process simulated network used for
//! tests and local scripts, and Avalanche C-Chain mainnet.

use std::fmt;

use crate::error::ConfigError;
use crate::secret::Secret;

/// Public Avalanche C-Chain RPC endpoint.
pub const AVALANCHE_C_CHAIN_RPC: &str = "https://api.avax.network/ext/bc/C/rpc";

/// Gas price used on both networks, in wei (225 nAVAX).
pub const DEFAULT_GAS_PRICE_WEI: u64 = 225_000_000_000;

pub const HARDHAT_CHAIN_ID: u64 = 31337;
pub const MAINNET_CHAIN_ID: u64 = 43114;

/// Supported network targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Local simulated network - optionally forked from mainnet
    Hardhat,
    /// Avalanche C-Chain mainnet - production
    Mainnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Hardhat, Network::Mainnet];

    /// Get network as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Hardhat => "hardhat",
            Network::Mainnet => "mainnet",
        }
    }

    /// Parse network from its name or its chain ID
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<u64>()
                .ok()
                .and_then(Self::from_chain_id)
                .ok_or_else(|| ConfigError::UnknownNetwork(s.to_string()));
        }
        match s.to_lowercase().as_str() {
            "hardhat" => Ok(Network::Hardhat),
            "mainnet" => Ok(Network::Mainnet),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Hardhat => HARDHAT_CHAIN_ID,
            Network::Mainnet => MAINNET_CHAIN_ID,
        }
    }

    /// RPC endpoint, `None` for the in-process network
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Hardhat => None,
            Network::Mainnet => Some(AVALANCHE_C_CHAIN_RPC),
        }
    }

    /// Whether this is the local simulated target. Only it may fork.
    pub fn is_simulated(&self) -> bool {
        matches!(self, Network::Hardhat)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gas price policy for transactions sent to a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPrice {
    /// Let the signer estimate the price at send time
    Auto,
    /// Fixed price in wei
    Fixed(u64),
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasPrice::Auto => f.write_str("auto"),
            GasPrice::Fixed(wei) => write!(f, "{} wei", wei),
        }
    }
}

/// Upstream endpoint the simulated network replicates state from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkConfig {
    pub url: String,
}

/// Where signing accounts come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsSource {
    Mnemonic(Secret),
}

/// One resolved network target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub network: Network,
    pub rpc_url: Option<String>,
    pub chain_id: u64,
    pub gas_price: GasPrice,
    pub fork: Option<ForkConfig>,
    pub accounts: Option<AccountsSource>,
}

impl NetworkProfile {
    pub fn name(&self) -> &'static str {
        self.network.as_str()
    }

    /// Signed operations need an account source
    pub fn can_sign(&self) -> bool {
        self.accounts.is_some()
    }

    pub fn is_forking(&self) -> bool {
        self.fork.is_some()
    }

    pub fn mnemonic(&self) -> Option<&Secret> {
        match &self.accounts {
            Some(AccountsSource::Mnemonic(secret)) => Some(secret),
            None => None,
        }
    }
}
