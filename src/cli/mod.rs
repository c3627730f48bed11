//! CLI command definitions for kubedepot
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod commands;

use crate::config::AppConfig;
use crate::format::Encoding;
use clap::{Args, Parser, Subcommand};

/// Kubeconfig distribution server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Address to bind (overrides config and HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Directory holding kubeconfig files (overrides config and CONFIGS_DIR)
    #[arg(long, global = true)]
    pub configs_dir: Option<String>,

    /// Directory with an index.html overriding the built-in page (overrides config and WEB_DIR)
    #[arg(long, global = true)]
    pub web_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve,

    /// Load and validate every kubeconfig, then exit
    Check,

    /// Print the available config names
    List(ListArgs),

    /// Print the merged kubeconfig for the given names
    Get(GetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = Encoding::Json)]
    pub format: Encoding,
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Config to include; repeat for several. All configs when omitted.
    #[arg(short, long = "name")]
    pub names: Vec<String>,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = Encoding::Yaml)]
    pub format: Encoding,
}

impl Cli {
    /// Apply command-line overrides on top of an already resolved config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = &self.configs_dir {
            config.configs_dir = dir.into();
        }
        if let Some(dir) = &self.web_dir {
            config.web_dir = dir.into();
        }
        if self.verbose {
            config.debug = true;
        }
    }
}
