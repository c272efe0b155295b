//! CLI module for the notes server
//!
//! Provides command-line interface parsing for the notes-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Notes Server - a personal notes API with token authentication
#[derive(Parser, Debug)]
#[command(
    name = "notes-server",
    version,
    about = "Notes Server - personal notes API with token authentication",
    long_about = "A personal notes API. Accounts register and log in to receive a signed\n\
                  bearer token, then create, read, update and delete the notes they own.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a new project.",
    after_help = "EXAMPLES:\n    \
                  notes-server init                # Scaffold notes.toml and .env.example\n    \
                  notes-server                     # Start the server (requires notes.toml)\n    \
                  notes-server --config my.toml    # Use a custom config file\n    \
                  notes-server config --validate   # Check the configuration and exit"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "notes.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new notes server project
    ///
    /// Creates notes.toml, .env.example, a data/ directory and a .gitignore.
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "5011")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file (including environment variables)
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_without_subcommand() {
        let cli = Cli::try_parse_from(["notes-server"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("notes.toml"));
        assert!(!cli.verbose);
        assert!(!cli.no_color);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_init_arguments() {
        let cli = Cli::try_parse_from([
            "notes-server",
            "init",
            "my-notes",
            "--force",
            "--port",
            "8080",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Init {
                path,
                force,
                host,
                port,
            }) => {
                assert_eq!(path, PathBuf::from("my-notes"));
                assert!(force);
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8080);
            }
            other => panic!("expected init command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["notes-server", "config", "--validate", "-c", "other.toml"])
                .unwrap();

        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(
            cli.command,
            Some(Commands::Config { validate: true })
        ));
    }
}
