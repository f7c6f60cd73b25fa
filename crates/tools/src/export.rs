//! Rendering the resolved configuration
//!
//! The exported document uses the layout the contract build tool reads:
//!
//! ```toml
//! [networks.hardhat]
//! gasPrice = 225000000000
//! chainId = 31337
//!
//! [networks.mainnet]
//! url = "https://api.avax.network/ext/bc/C/rpc"
//! # ...
//!
//! [etherscan]
//! apiKey = "***"
//!
//! [solidity]
//! version = "0.8.9"
//! ```
//!
//! Secrets are written as `***` unless the caller asks for them explicitly.

use std::collections::BTreeMap;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use crate::config::Configuration;
use crate::error::ConfigError;
use crate::network::{GasPrice, NetworkProfile};
use crate::secret::{Secret, REDACTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Toml,
}

#[derive(Serialize)]
struct Document<'a> {
    networks: BTreeMap<&'static str, NetworkEntry<'a>>,
    etherscan: EtherscanEntry<'a>,
    solidity: SolidityEntry<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworkEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    gas_price: GasPriceValue,
    chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    forking: Option<ForkingEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accounts: Option<AccountsEntry<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GasPriceValue {
    Wei(u64),
    Auto(&'static str),
}

#[derive(Serialize)]
struct ForkingEntry<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct AccountsEntry<'a> {
    mnemonic: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EtherscanEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Serialize)]
struct SolidityEntry<'a> {
    version: &'a str,
    settings: SettingsEntry,
}

#[derive(Serialize)]
struct SettingsEntry {
    optimizer: OptimizerEntry,
}

#[derive(Serialize)]
struct OptimizerEntry {
    enabled: bool,
    runs: u32,
}

fn secret_value(secret: &Secret, reveal: bool) -> &str {
    if reveal {
        secret.expose()
    } else {
        REDACTED
    }
}

fn network_entry(profile: &NetworkProfile, reveal: bool) -> NetworkEntry<'_> {
    NetworkEntry {
        url: profile.rpc_url.as_deref(),
        gas_price: match profile.gas_price {
            GasPrice::Auto => GasPriceValue::Auto("auto"),
            GasPrice::Fixed(wei) => GasPriceValue::Wei(wei),
        },
        chain_id: profile.chain_id,
        forking: profile
            .fork
            .as_ref()
            .map(|fork| ForkingEntry { url: &fork.url }),
        accounts: profile.mnemonic().map(|mnemonic| AccountsEntry {
            mnemonic: secret_value(mnemonic, reveal),
        }),
    }
}

fn document(config: &Configuration, reveal: bool) -> Document<'_> {
    Document {
        networks: config
            .networks()
            .iter()
            .map(|profile| (profile.name(), network_entry(profile, reveal)))
            .collect(),
        etherscan: EtherscanEntry {
            api_key: config
                .explorer()
                .map(|explorer| secret_value(&explorer.api_key, reveal)),
        },
        solidity: SolidityEntry {
            version: &config.compiler().version,
            settings: SettingsEntry {
                optimizer: OptimizerEntry {
                    enabled: config.compiler().optimizer.enabled,
                    runs: config.compiler().optimizer.runs,
                },
            },
        },
    }
}

/// Render the configuration document
pub fn render(
    config: &Configuration,
    format: ExportFormat,
    reveal_secrets: bool,
) -> Result<String, ConfigError> {
    let doc = document(config, reveal_secrets);
    let rendered = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&doc)?,
        ExportFormat::Toml => toml::to_string_pretty(&doc)?,
    };
    Ok(rendered)
}

/// Render and write the document to `path`
pub fn write_to(
    path: &Path,
    config: &Configuration,
    format: ExportFormat,
    reveal_secrets: bool,
) -> Result<(), ConfigError> {
    let rendered = render(config, format, reveal_secrets)?;
    std::fs::write(path, rendered)?;
    info!(path = %path.display(), ?format, "configuration exported");
    Ok(())
}

fn configured(present: bool) -> &'static str {
    if present {
        "(configured)"
    } else {
        "(not configured)"
    }
}

/// Print one network profile
pub fn print_network(profile: &NetworkProfile) {
    println!("  [{}]", profile.network);
    println!("    Chain ID:          {}", profile.chain_id);
    println!(
        "    RPC URL:           {}",
        profile.rpc_url.as_deref().unwrap_or("(in-process)")
    );
    println!("    Gas Price:         {}", profile.gas_price);
    if let Some(fork) = &profile.fork {
        println!("    Fork Source:       {}", fork.url);
    }
    if !profile.network.is_simulated() {
        println!("    Mnemonic:          {}", configured(profile.can_sign()));
    }
}

/// Print the resolved configuration
pub fn print_summary(config: &Configuration) {
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║         TOOLCHAIN CONFIGURATION RESOLVED                       ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!("  Default Network:     {}", config.default_network());
    for profile in config.networks() {
        print_network(profile);
    }
    println!("  Explorer API Key:    {}", configured(config.can_verify()));
    println!("  Solidity:            {}", config.compiler().version);
    match config.compiler().optimizer.effective_runs() {
        Some(runs) => println!("  Optimizer:           enabled ({} runs)", runs),
        None => println!("  Optimizer:           disabled"),
    }
    println!("╚════════════════════════════════════════════════════════════════╝");
}
