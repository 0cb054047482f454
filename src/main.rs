//! StoreBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use storebuddy::{
    catalog::{Catalog, InMemoryCatalog},
    cli::{Args, Commands},
    config::Config,
    doctor::Doctor,
    llm::OllamaClient,
    rag::ChatPipeline,
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    args.apply_overrides(&mut config);

    match args.command() {
        Commands::Serve { .. } => run_server(config).await,
        Commands::Ask { question } => run_ask(config, &question).await,
        Commands::Doctor => run_doctor(config).await,
        Commands::Config => show_config(&config),
    }
}

/// Stderr logging; `RUST_LOG` wins over the verbosity flags
fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.verbosity().log_filter()));

    let layer = if args.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

/// Wire catalog, model client and pipeline from configuration
fn build(config: &Config) -> Result<(Arc<ChatPipeline>, Arc<dyn Catalog>)> {
    let catalog: Arc<dyn Catalog> = Arc::new(
        InMemoryCatalog::from_path(&config.catalog.path).context("Failed to load product catalog")?,
    );
    let client = Arc::new(OllamaClient::from_config(&config.ollama)?);

    let pipeline = ChatPipeline::from_parts(
        Arc::clone(&catalog),
        client.clone(),
        client,
        config,
    );

    Ok((Arc::new(pipeline), catalog))
}

async fn run_server(config: Config) -> Result<()> {
    let (pipeline, catalog) = build(&config)?;
    tracing::info!(
        products = catalog.count().await?,
        model = %config.ollama.model,
        ollama = %config.ollama.base_url(),
        "starting chat server"
    );

    let state = AppState {
        pipeline,
        catalog,
        model: config.ollama.model.clone(),
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
    };

    server::serve(state, &config.server.bind).await
}

async fn run_ask(config: Config, question: &str) -> Result<()> {
    let (pipeline, _) = build(&config)?;
    let outcome = pipeline.ask(question).await?;

    if !outcome.is_grounded() {
        eprintln!("{}", "No relevant products found.".yellow());
    }
    println!("{}", outcome.answer());

    Ok(())
}

async fn run_doctor(config: Config) -> Result<()> {
    let doctor = Doctor::new(config);
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    if Doctor::overall_status(&checks) {
        println!("{}", "All checks passed.".green());
        Ok(())
    } else {
        anyhow::bail!("One or more checks failed")
    }
}

fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", rendered);
    Ok(())
}
