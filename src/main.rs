//! kubedepot
//!
//! Serves a directory of kubeconfig files over HTTP, individually or merged.

use anyhow::{Context, Result};
use clap::Parser;
use kubedepot::cli::commands::{run_check, run_get, run_list};
use kubedepot::cli::{Cli, Command};
use kubedepot::config::AppConfig;
use kubedepot::logging::{self, LogTarget};
use kubedepot::store::ConfigStore;
use kubedepot::web::{self, AppState, IndexPage};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolve configuration from file, environment and command line.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_env()?;
    cli.apply_overrides(&mut config);
    Ok(config)
}

/// Build the store, failing startup on any load or merge problem.
fn open_store(config: &AppConfig) -> Result<ConfigStore> {
    ConfigStore::open(&config.configs_dir).with_context(|| {
        format!(
            "Failed to load configs from {}",
            config.configs_dir.display()
        )
    })
}

async fn serve(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;

    let index = IndexPage::load(&config.web_dir).with_context(|| {
        format!(
            "Failed to read index page from {}",
            config.web_dir.display()
        )
    })?;
    debug!(source = ?index.source(), "Index page ready");

    let state = AppState::new(Arc::new(store), Arc::new(index));
    let handle = web::start_server(&config.bind_addr(), state)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    handle.shutdown().await;
    Ok(())
}

/// Print the output of an offline subcommand.
fn print(out: &str) -> Result<()> {
    std::io::stdout().write_all(out.as_bytes())?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    logging::init(&LogTarget::parse(&cli.log), config.debug)?;

    info!("Starting kubedepot");
    info!(
        host = %config.host,
        port = config.port,
        configs_dir = ?config.configs_dir,
        web_dir = ?config.web_dir,
        debug = config.debug,
        "Configuration loaded"
    );

    let command = cli.command.clone().unwrap_or(Command::Serve);
    debug!(command = ?command, "Running command");

    match command {
        Command::Serve => serve(&config).await,
        Command::Check => print(&run_check(&open_store(&config)?)),
        Command::List(args) => print(&run_list(&open_store(&config)?, &args)?),
        Command::Get(args) => print(&run_get(&open_store(&config)?, &args)?),
    }
}
