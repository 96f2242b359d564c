//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build, browse, and check handbook content.
#[derive(Parser, Debug)]
#[command(name = "handbook", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "HANDBOOK_CONFIG")]
    pub config: Option<String>,

    /// Content directory (overrides the configuration)
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render every page and drawer note to a static directory.
    Build {
        /// Output directory (overrides the configuration)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the navigation tree.
    Nav {
        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,

        /// Only list sections whose title or category contains this text
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Navigate to a route and print what the reader would see.
    Show {
        /// Route such as `/privacy/consent#key-terms`
        route: String,

        /// Open a drawer note after navigating
        #[arg(long)]
        drawer: Option<String>,
    },

    /// Report unreadable files, dangling nav links, and missing drawer notes.
    Check,

    /// Manage the configuration file.
    #[command(subcommand)]
    Config(ConfigAction),
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print a value by dotted key, e.g. `display.sidebar_width`.
    Get { key: String },

    /// Set a value by dotted key.
    Set { key: String, value: String },

    /// Write a default configuration file.
    Init {
        /// Where to write it (defaults to the resolved config path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables.
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["handbook", "nav", "--json", "--content", "md", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.content, Some(PathBuf::from("md")));
        assert!(matches!(cli.command, Command::Nav { json: true, filter: None }));
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["handbook", "config", "set", "display.drawer_width", "500"]).unwrap();
        match cli.command {
            Command::Config(ConfigAction::Set { key, value }) => {
                assert_eq!(key, "display.drawer_width");
                assert_eq!(value, "500");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
