//! Command-line argument parsing for StoreBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.
//! Flags given here override values from the config file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// StoreBuddy - product assistant for the Suchitra Cosmetics storefront
#[derive(Parser, Debug)]
#[command(name = "storebuddy")]
#[command(version)]
#[command(about = "Answer customer product questions from the catalog with a local Ollama model", long_about = None)]
pub struct Args {
    /// Ollama model to use
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Ollama host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Ollama port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Product catalog export (JSON)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve the chatbot HTTP endpoint
    Serve {
        /// Address to bind, e.g. 0.0.0.0:8000
        #[arg(long)]
        bind: Option<String>,
    },

    /// Answer one question and exit
    Ask {
        /// The customer question
        #[arg(value_name = "QUESTION")]
        question: String,
    },

    /// Run deployment diagnostics
    Doctor,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Serve { bind: None })
    }

    /// Apply command-line overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.ollama.model = model.clone();
        }
        if let Some(host) = &self.host {
            config.ollama.host = host.clone();
        }
        if let Some(port) = self.port {
            config.ollama.port = port;
        }
        if let Some(catalog) = &self.catalog {
            config.catalog.path = catalog.clone();
        }
        if let Some(Commands::Serve { bind: Some(bind) }) = &self.command {
            config.server.bind = bind.clone();
        }
    }
}

impl Verbosity {
    /// Default `tracing` filter directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["storebuddy", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["storebuddy"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["storebuddy", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["storebuddy", "-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(Verbosity::Quiet.log_filter(), "error");
        assert_eq!(Verbosity::Normal.log_filter(), "info");
        assert_eq!(Verbosity::VeryVerbose.log_filter(), "trace");
    }

    #[test]
    fn test_default_command_is_serve() {
        assert_eq!(parse(&["storebuddy"]).command(), Commands::Serve { bind: None });
    }

    #[test]
    fn test_ask_command() {
        let args = parse(&["storebuddy", "ask", "do you have any red lipstick?"]);
        assert_eq!(
            args.command(),
            Commands::Ask {
                question: "do you have any red lipstick?".to_string()
            }
        );
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "storebuddy",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--model",
            "mistral",
            "--port",
            "8080",
            "--catalog",
            "/srv/products.json",
        ]);

        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.port, 8080);
        assert_eq!(config.ollama.host, "127.0.0.1");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.catalog.path, PathBuf::from("/srv/products.json"));
    }

    #[test]
    fn test_no_overrides_keeps_file_values() {
        let mut config = Config::default();
        config.ollama.model = "from-file".to_string();

        parse(&["storebuddy", "doctor"]).apply_overrides(&mut config);
        assert_eq!(config.ollama.model, "from-file");
    }
}
