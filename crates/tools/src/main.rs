use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use avax_deploy_tools::export::{self, ExportFormat};
use avax_deploy_tools::Configuration;

#[derive(Parser)]
#[command(name = "avax-deploy")]
#[command(about = "Resolve and inspect the Avalanche contract toolchain configuration")]
struct Cli {
    /// Read variables from this .env file instead of the default lookup
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration
    Show,
    /// Validate the configuration and report unavailable capabilities
    Check,
    /// Print a single network profile
    Network {
        /// Network name (hardhat/mainnet) or chain ID
        name: String,
    },
    /// Export the configuration document
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include mnemonic and API key values
        #[arg(long)]
        reveal_secrets: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Configuration::load(cli.env_file.as_deref())
        .context("failed to resolve configuration")?;
    debug!(networks = config.networks().len(), "configuration loaded");

    match cli.command {
        Commands::Show => export::print_summary(&config),
        // `load` has already logged each warning
        Commands::Check => println!(
            "Configuration is valid ({} network(s), {} warning(s))",
            config.networks().len(),
            config.warnings().len()
        ),
        Commands::Network { name } => {
            let profile = config.find(&name)?;
            export::print_network(profile);
        }
        Commands::Export {
            format,
            output,
            reveal_secrets,
        } => match output {
            Some(path) => export::write_to(&path, &config, format, reveal_secrets)
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => println!("{}", export::render(&config, format, reveal_secrets)?),
        },
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "avax_deploy_tools=info,avax_deploy=info",
        1 => "avax_deploy_tools=debug,avax_deploy=debug",
        _ => "avax_deploy_tools=trace,avax_deploy=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
