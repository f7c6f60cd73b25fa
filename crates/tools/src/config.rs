//! Toolchain configuration resolution
//!
//! This module builds the single, immutable [`Configuration`] record consumed
//! by the contract build and deploy tooling. Values come from two places:
//!
//! 1. Fixed literals (chain IDs, gas prices, RPC endpoint, compiler settings)
//! 2. An [`EnvSnapshot`] holding `MNEMONIC`, `SNOWTRACE_API_KEY` and
//!    `USE_LOCAL_TESTNET`
//!
//! A missing variable never fails resolution. The capability it enables
//! (signing, explorer verification, forking) is simply left unset.
//!
//! # Examples
//!
//! ```rust
//! use avax_deploy_tools::config::resolve;
//! use avax_deploy_tools::env::EnvSnapshot;
//!
//! # fn main() -> Result<(), avax_deploy_tools::ConfigError> {
//! let config = resolve(&EnvSnapshot::new().with("USE_LOCAL_TESTNET", "1"));
//! assert!(config.simulated()?.is_forking());
//! assert!(!config.production()?.can_sign());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::compiler::CompilerSpec;
use crate::env::{EnvSnapshot, MNEMONIC, SNOWTRACE_API_KEY, USE_LOCAL_TESTNET};
use crate::error::ConfigError;
use crate::network::{
    AccountsSource, ForkConfig, GasPrice, Network, NetworkProfile, AVALANCHE_C_CHAIN_RPC,
    DEFAULT_GAS_PRICE_WEI,
};
use crate::secret::Secret;

/// API key for contract verification on the block explorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerCredential {
    pub api_key: Secret,
}

/// Resolved toolchain configuration
///
/// Only [`resolve`] builds one; callers get read-only access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Network profiles, simulated network first
    pub(crate) networks: Vec<NetworkProfile>,
    /// Profile used when the caller does not pick one
    pub(crate) default_network: Network,
    pub(crate) explorer: Option<ExplorerCredential>,
    pub(crate) compiler: CompilerSpec,
}

/// Build the configuration from an environment snapshot.
///
/// Pure and infallible: equal snapshots always produce equal records.
/// `USE_LOCAL_TESTNET` enables forking only when it is exactly `"1"`.
pub fn resolve(env: &EnvSnapshot) -> Configuration {
    let fork = (env.get(USE_LOCAL_TESTNET) == Some("1")).then(|| ForkConfig {
        url: AVALANCHE_C_CHAIN_RPC.to_string(),
    });

    let accounts = env
        .get(MNEMONIC)
        .map(|phrase| AccountsSource::Mnemonic(Secret::new(phrase)));

    let explorer = env.get(SNOWTRACE_API_KEY).map(|key| ExplorerCredential {
        api_key: Secret::new(key),
    });

    let hardhat = NetworkProfile {
        network: Network::Hardhat,
        rpc_url: Network::Hardhat.default_rpc_url().map(str::to_string),
        chain_id: Network::Hardhat.chain_id(),
        gas_price: GasPrice::Fixed(DEFAULT_GAS_PRICE_WEI),
        fork,
        accounts: None,
    };

    let mainnet = NetworkProfile {
        network: Network::Mainnet,
        rpc_url: Network::Mainnet.default_rpc_url().map(str::to_string),
        chain_id: Network::Mainnet.chain_id(),
        gas_price: GasPrice::Fixed(DEFAULT_GAS_PRICE_WEI),
        fork: None,
        accounts,
    };

    Configuration {
        networks: vec![hardhat, mainnet],
        default_network: Network::Hardhat,
        explorer,
        compiler: CompilerSpec::default(),
    }
}

impl Configuration {
    /// Load configuration from the process environment and `.env`
    ///
    /// # Resolution Order
    ///
    /// 1. Read `.env` (the given path, or the default lookup)
    /// 2. Overlay the process environment
    /// 3. Resolve against the fixed literals
    /// 4. Validate
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - An explicitly named `.env` file is missing or malformed
    /// - A consumed variable is set but is not valid Unicode
    /// - Validation fails
    pub fn load(dotenv_path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = EnvSnapshot::capture(dotenv_path)?;
        let config = resolve(&env);
        config.validate()?;
        config.report_capabilities();
        Ok(config)
    }

    /// Check the record's structural invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.networks.is_empty() {
            return Err(ConfigError::validation("no networks configured"));
        }

        let mut names = HashSet::new();
        let mut chain_ids = HashSet::new();
        for profile in &self.networks {
            if !names.insert(profile.name()) {
                return Err(ConfigError::validation(format!(
                    "duplicate network name: {}",
                    profile.name()
                )));
            }
            if profile.chain_id == 0 {
                return Err(ConfigError::validation(format!(
                    "chain ID of {} must be positive",
                    profile.name()
                )));
            }
            if !chain_ids.insert(profile.chain_id) {
                return Err(ConfigError::validation(format!(
                    "duplicate chain ID: {}",
                    profile.chain_id
                )));
            }
            if let Some(url) = &profile.rpc_url {
                Self::validate_url("RPC URL", url)?;
            }
            if let Some(fork) = &profile.fork {
                if !profile.network.is_simulated() {
                    return Err(ConfigError::validation(format!(
                        "fork source is only allowed on the simulated network, found on {}",
                        profile.name()
                    )));
                }
                Self::validate_url("fork URL", &fork.url)?;
            }
        }

        if !names.contains(self.default_network.as_str()) {
            return Err(ConfigError::validation(format!(
                "default network {} has no profile",
                self.default_network
            )));
        }

        self.compiler.validate()
    }

    fn validate_url(label: &str, url: &str) -> Result<(), ConfigError> {
        if url.is_empty() {
            return Err(ConfigError::validation(format!("{} is empty", label)));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::validation(format!(
                "{} must start with http:// or https://: {}",
                label, url
            )));
        }
        Ok(())
    }

    /// Describe every optional capability that is unavailable
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for profile in &self.networks {
            if !profile.network.is_simulated() && !profile.can_sign() {
                warnings.push(format!(
                    "{} not set; signed operations on {} are unavailable",
                    MNEMONIC, profile.network
                ));
            }
        }
        if !self.can_verify() {
            warnings.push(format!(
                "{} not set; contract verification is unavailable",
                SNOWTRACE_API_KEY
            ));
        }
        warnings
    }

    fn report_capabilities(&self) {
        for profile in self.networks.iter().filter(|p| p.is_forking()) {
            info!(network = %profile.network, "forking enabled");
        }
        for warning in self.warnings() {
            warn!("{}", warning);
        }
        debug!(config = ?self, "configuration resolved");
    }

    pub fn networks(&self) -> &[NetworkProfile] {
        &self.networks
    }

    pub fn default_network(&self) -> Network {
        self.default_network
    }

    pub fn explorer(&self) -> Option<&ExplorerCredential> {
        self.explorer.as_ref()
    }

    pub fn compiler(&self) -> &CompilerSpec {
        &self.compiler
    }

    pub fn network(&self, network: Network) -> Option<&NetworkProfile> {
        self.networks.iter().find(|p| p.network == network)
    }

    pub fn network_by_chain_id(&self, chain_id: u64) -> Option<&NetworkProfile> {
        self.networks.iter().find(|p| p.chain_id == chain_id)
    }

    /// Look up a profile by name or chain ID
    pub fn find(&self, name_or_chain_id: &str) -> Result<&NetworkProfile, ConfigError> {
        let network = Network::parse(name_or_chain_id)?;
        self.network(network)
            .ok_or_else(|| ConfigError::UnknownNetwork(name_or_chain_id.to_string()))
    }

    pub fn default_profile(&self) -> Result<&NetworkProfile, ConfigError> {
        self.profile_of(self.default_network)
    }

    pub fn simulated(&self) -> Result<&NetworkProfile, ConfigError> {
        self.profile_of(Network::Hardhat)
    }

    pub fn production(&self) -> Result<&NetworkProfile, ConfigError> {
        self.profile_of(Network::Mainnet)
    }

    fn profile_of(&self, network: Network) -> Result<&NetworkProfile, ConfigError> {
        self.network(network)
            .ok_or_else(|| ConfigError::UnknownNetwork(network.to_string()))
    }

    /// Explorer verification needs an API key
    pub fn can_verify(&self) -> bool {
        self.explorer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::testing::{write_dotenv, ProcessEnvGuard};

    const PHRASE: &str = "test test test test test test test test test test test junk";

    fn full_env() -> EnvSnapshot {
        EnvSnapshot::new()
            .with(MNEMONIC, PHRASE)
            .with(SNOWTRACE_API_KEY, "SNOWKEY")
            .with(USE_LOCAL_TESTNET, "1")
    }

    #[test]
    fn test_fork_enabled_only_for_literal_one() {
        let config = resolve(&EnvSnapshot::new().with(USE_LOCAL_TESTNET, "1"));
        assert_eq!(
            config.simulated().unwrap().fork,
            Some(ForkConfig {
                url: "https://api.avax.network/ext/bc/C/rpc".to_string()
            })
        );

        for value in ["true", "0", "", " 1", "1 ", "01", "yes", "TRUE"] {
            let config = resolve(&EnvSnapshot::new().with(USE_LOCAL_TESTNET, value));
            assert!(config.simulated().unwrap().fork.is_none(), "forked for {:?}", value);
        }

        assert!(resolve(&EnvSnapshot::new()).simulated().unwrap().fork.is_none());
    }

    #[test]
    fn test_missing_mnemonic_leaves_accounts_unset() {
        let config = resolve(&EnvSnapshot::new());
        assert!(config.production().unwrap().accounts.is_none());
        assert!(!config.production().unwrap().can_sign());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mnemonic_passed_through_unvalidated() {
        let config = resolve(&EnvSnapshot::new().with(MNEMONIC, "not a real phrase"));
        assert_eq!(
            config.production().unwrap().mnemonic().map(Secret::expose),
            Some("not a real phrase")
        );
        assert!(config.simulated().unwrap().accounts.is_none());
    }

    #[test]
    fn test_missing_explorer_key() {
        let config = resolve(&EnvSnapshot::new());
        assert!(config.explorer.is_none());
        assert!(!config.can_verify());

        let config = resolve(&EnvSnapshot::new().with(SNOWTRACE_API_KEY, "abc"));
        assert_eq!(
            config.explorer.as_ref().map(|e| e.api_key.expose()),
            Some("abc")
        );
    }

    #[test]
    fn test_literals_independent_of_environment() {
        for env in [EnvSnapshot::new(), full_env()] {
            let config = resolve(&env);
            assert_eq!(config.simulated().unwrap().chain_id, 31337);
            assert_eq!(config.production().unwrap().chain_id, 43114);
            assert_eq!(
                config.production().unwrap().rpc_url.as_deref(),
                Some("https://api.avax.network/ext/bc/C/rpc")
            );
            assert_eq!(config.simulated().unwrap().rpc_url, None);
            for profile in &config.networks {
                assert_eq!(profile.gas_price, GasPrice::Fixed(225_000_000_000));
            }
            assert_eq!(config.compiler.version, "0.8.9");
            assert!(config.compiler.optimizer.enabled);
            assert_eq!(config.compiler.optimizer.runs, 200);
            assert_eq!(config.default_network, Network::Hardhat);
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let env = full_env();
        assert_eq!(resolve(&env), resolve(&env));
        assert_eq!(resolve(&EnvSnapshot::new()), resolve(&EnvSnapshot::new()));
    }

    #[test]
    fn test_resolved_configs_validate() {
        assert!(resolve(&EnvSnapshot::new()).validate().is_ok());
        assert!(resolve(&full_env()).validate().is_ok());
    }

    #[test]
    fn test_lookups() {
        let config = resolve(&full_env());
        assert_eq!(config.find("mainnet").unwrap().chain_id, 43114);
        assert_eq!(config.find("31337").unwrap().network, Network::Hardhat);
        assert!(config.find("fuji").is_err());
        assert_eq!(
            config.network_by_chain_id(43114).map(|p| p.network),
            Some(Network::Mainnet)
        );
        assert!(config.network_by_chain_id(1).is_none());
        assert_eq!(config.default_profile().unwrap().network, Network::Hardhat);
    }

    #[test]
    fn test_validate_duplicate_chain_id() {
        let mut config = resolve(&EnvSnapshot::new());
        config.networks[1].chain_id = 31337;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("duplicate chain ID")
        ));
    }

    #[test]
    fn test_validate_duplicate_name() {
        let mut config = resolve(&EnvSnapshot::new());
        config.networks[1].network = Network::Hardhat;
        config.networks[1].chain_id = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_fork_on_production() {
        let mut config = resolve(&EnvSnapshot::new());
        config.networks[1].fork = Some(ForkConfig {
            url: AVALANCHE_C_CHAIN_RPC.to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_rpc_url() {
        let mut config = resolve(&EnvSnapshot::new());
        config.networks[1].rpc_url = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());

        config.networks[1].rpc_url = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_chain_id() {
        let mut config = resolve(&EnvSnapshot::new());
        config.networks[0].chain_id = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_compiler_version() {
        let mut config = resolve(&EnvSnapshot::new());
        config.compiler.version = "latest".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_missing_default_profile() {
        let mut config = resolve(&EnvSnapshot::new());
        config.networks.remove(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accessors_report_missing_profiles() {
        let mut config = resolve(&EnvSnapshot::new());
        config.networks.retain(|p| p.network != Network::Mainnet);
        assert!(matches!(
            config.production(),
            Err(ConfigError::UnknownNetwork(name)) if name == "mainnet"
        ));
        assert_eq!(config.simulated().unwrap().chain_id, 31337);

        config.networks.clear();
        assert!(config.simulated().is_err());
        assert!(config.default_profile().is_err());
    }

    #[test]
    fn test_read_only_getters() {
        let config = resolve(&full_env());
        assert_eq!(config.networks().len(), 2);
        assert_eq!(config.default_network(), Network::Hardhat);
        assert_eq!(config.explorer().map(|e| e.api_key.expose()), Some("SNOWKEY"));
        assert_eq!(config.compiler(), &CompilerSpec::default());
    }

    #[test]
    fn test_load_from_dotenv_file() {
        let _guard = ProcessEnvGuard::acquire();
        let file = write_dotenv(&format!(
            "MNEMONIC=\"{}\"\nSNOWTRACE_API_KEY=SNOWKEY\nUSE_LOCAL_TESTNET=1\n",
            PHRASE
        ));

        let config = Configuration::load(Some(file.path())).unwrap();
        assert_eq!(
            config.simulated().unwrap().fork.as_ref().map(|f| f.url.as_str()),
            Some(AVALANCHE_C_CHAIN_RPC)
        );
        assert_eq!(
            config.production().unwrap().mnemonic().map(Secret::expose),
            Some(PHRASE)
        );
        assert_eq!(config.explorer().map(|e| e.api_key.expose()), Some("SNOWKEY"));
    }

    #[test]
    fn test_load_ignores_non_literal_flag() {
        let _guard = ProcessEnvGuard::acquire();
        let file = write_dotenv("USE_LOCAL_TESTNET=true\n");

        let config = Configuration::load(Some(file.path())).unwrap();
        assert_eq!(config, resolve(&EnvSnapshot::new()));
        assert_eq!(config.warnings().len(), 2);
    }

    #[test]
    fn test_warnings() {
        let warnings = resolve(&EnvSnapshot::new()).warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("MNEMONIC"));
        assert!(warnings[1].contains("SNOWTRACE_API_KEY"));

        assert!(resolve(&full_env()).warnings().is_empty());
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let rendered = format!("{:?}", resolve(&full_env()));
        assert!(!rendered.contains("junk"));
        assert!(!rendered.contains("SNOWKEY"));
    }
}
