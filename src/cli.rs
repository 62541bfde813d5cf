//! CLI argument parsing using clap v4

use clap::{Parser, Subcommand};

/// Living Map - an interactive map of AI-generated personas
///
/// Serves the map page and a small JSON API that turns a prompt and a map
/// location into a generated persona video.
#[derive(Parser, Debug)]
#[command(name = "living-map")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(short, long, env = "LIVING_MAP_CONFIG")]
        config: Option<String>,

        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["living-map", "serve", "--host", "127.0.0.1", "-p", "8080"]);
        match cli.command {
            Commands::Serve { host, port, .. } => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(8080));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_serve_with_config() {
        let cli = Cli::parse_from(["living-map", "serve", "--config", "/etc/map.toml"]);
        match cli.command {
            Commands::Serve { config, host, .. } => {
                assert_eq!(config, Some("/etc/map.toml".to_string()));
                assert!(host.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["living-map", "serve", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_verbose_flags() {
        let cli = Cli::parse_from(["living-map", "-vv", "version"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::parse_from(["living-map", "--quiet", "version"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["living-map", "config", "init", "--force"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Init { path, force },
            } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_config_validate() {
        let cli = Cli::parse_from(["living-map", "config", "validate", "-c", "map.toml"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Validate { config },
            } => assert_eq!(config.as_deref(), Some("map.toml")),
            _ => panic!("Expected Config Validate command"),
        }
    }
}
