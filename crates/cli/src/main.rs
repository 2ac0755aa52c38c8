//! ENS command line interface
//!
//! Resolve names, reverse-resolve addresses, look up owners and compute
//! namehashes. A name that does not resolve is a normal outcome: the message
//! goes to stderr and the exit code stays 0.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ensgate_resolver::{
    Address, NetworkContext, NetworkRegistry, RecordBook, ResolveOptions, Resolver,
    ResolverConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ensgate")]
#[command(about = "ENS name resolution", long_about = None)]
#[command(version)]
struct Cli {
    /// Resolver configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Record book serving as the set of available providers (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    records: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an ENS name to an address
    Resolve {
        name: String,
        #[command(flatten)]
        target: TargetArgs,
        /// Skip the resolution cache for this lookup
        #[arg(long)]
        no_cache: bool,
    },
    /// Get the ENS name of an address
    Name {
        address: Address,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Get the owner of an ENS name
    Owner {
        name: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Print the namehash (node id) of a name
    Namehash { name: String },
}

#[derive(Args)]
struct TargetArgs {
    /// Network to activate first, as ecosystem:network
    #[arg(long, value_name = "ECOSYSTEM:NETWORK")]
    network: Option<NetworkContext>,

    /// Registry deployment to query instead of the configured one
    #[arg(long, value_name = "ADDRESS")]
    registry_address: Option<Address>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config =
        ResolverConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let networks = load_networks(cli.records.as_ref())?;

    match cli.command {
        Commands::Resolve {
            name,
            target,
            no_cache,
        } => {
            let mut resolver = build_resolver(&networks, &config, &target)?;
            let options = ResolveOptions {
                use_cache: no_cache.then_some(false),
                registry_address: target.registry_address,
            };
            match resolver.resolve(&name, options)? {
                Some(address) => println!("{address}"),
                None => eprintln!("Could not resolve ENS '{name}'."),
            }
        }
        Commands::Name { address, target } => {
            let mut resolver = build_resolver(&networks, &config, &target)?;
            match resolver.reverse_resolve(&address, target.registry_address.as_ref())? {
                Some(name) => println!("{name}"),
                None => eprintln!("No ENS name found for '{address}'."),
            }
        }
        Commands::Owner { name, target } => {
            let mut resolver = build_resolver(&networks, &config, &target)?;
            match resolver.owner_of(&name, target.registry_address.as_ref())? {
                Some(owner) => println!("{owner}"),
                None => eprintln!("No owner found for '{name}'."),
            }
        }
        Commands::Namehash { name } => {
            let resolver = Resolver::from_config(networks, &config)?;
            println!("{}", resolver.compute_node_id(&name)?);
        }
    }

    Ok(())
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_networks(records: Option<&PathBuf>) -> Result<Arc<NetworkRegistry>> {
    match records {
        Some(path) => {
            let book = RecordBook::load(path)
                .with_context(|| format!("failed to load record book {}", path.display()))?;
            debug!(
                providers = book.providers.len(),
                records = book.records.len(),
                "loaded record book"
            );
            Ok(book.into_networks()?)
        }
        None => Ok(Arc::new(NetworkRegistry::new())),
    }
}

fn build_resolver(
    networks: &Arc<NetworkRegistry>,
    config: &ResolverConfig,
    target: &TargetArgs,
) -> Result<Resolver> {
    if let Some(network) = &target.network {
        networks
            .activate(network)
            .with_context(|| format!("failed to connect to {network}"))?;
    }
    Ok(Resolver::from_config(networks.clone(), config)?)
}
