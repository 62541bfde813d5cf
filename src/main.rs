//! Living Map - interactive map of AI-generated personas
//!
//! Entry point for the `living-map` binary. `serve` runs the HTTP server
//! that registers personas at map locations and lists them back.

mod cli;
mod config;
mod error;
mod generation;
mod identity;
mod logging;
mod server;
mod version;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::config::MapConfig;
use crate::error::{Error, Result};
use crate::server::Server;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config_path, host, port) = match cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand);
        }
        Commands::Serve { config, host, port } => (config, host, port),
    };

    let config = match MapConfig::load(config_path.as_deref())
        .and_then(|cfg| cfg.with_listen_overrides(host, port))
    {
        Ok(cfg) => cfg,
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    };

    // Guards must outlive the server so buffered file logs are flushed
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        profile = %build.profile,
        "Starting Living Map"
    );

    if let Err(e) = run_server(config) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn run_server(config: MapConfig) -> Result<()> {
    info!(
        listen = %config.listen_addr(),
        generator = %config.generator.backend,
        timeout_secs = config.generator.timeout_secs,
        "Configuration loaded"
    );

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all().thread_name("living-map");
    if config.server.worker_threads > 0 {
        builder.worker_threads(config.server.worker_threads);
    }
    let runtime = builder
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(async {
        let server = Server::new(config)?;
        server.run().await
    })
}

fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = MapConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to {}", written.display());
        }
        ConfigSubcommand::Validate { config } => match MapConfig::load(config.as_deref()) {
            Ok(_) => println!("Configuration is valid."),
            Err(e) => {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
        },
    }

    Ok(())
}
