//! CLI module for ytmcp.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// ytmcp - YouTube transcript MCP server
///
/// Serves YouTube transcripts and writing instructions to MCP clients over
/// HTTP, behind Auth0 bearer authentication.
#[derive(Parser, Debug)]
#[command(name = "ytmcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server (SSE and HTTP POST transports)
    Serve {
        /// Host to bind to [default: from config, 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to [default: from config, 8000]
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch a video transcript and print it as [MM:SS] lines
    Transcript {
        /// YouTube video URL
        url: String,
    },

    /// Print an instruction file from the prompts directory
    Instructions {
        /// Prompt name (e.g. write_blog_post)
        name: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["ytmcp", "-vv", "serve", "--host", "127.0.0.1", "-p", "9000"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli = Cli::parse_from(["ytmcp", "instructions", "write_blog_post", "-c", "/tmp/c.toml"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.toml"));
        assert!(matches!(cli.command, Commands::Instructions { ref name } if name == "write_blog_post"));
    }

    #[test]
    fn test_serve_defaults_come_from_settings() {
        let cli = Cli::parse_from(["ytmcp", "serve"]);
        assert!(matches!(cli.command, Commands::Serve { host: None, port: None }));
    }
}
