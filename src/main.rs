//! awsquiz HTTP server
//!
//! Starts an Axum web server exposing the quiz endpoint, or runs one of the
//! helper subcommands.

use awsquiz::{
    cli::{Cli, Command, generate_config_template},
    config::{ApiKeys, Config},
    handlers::{self, AppState},
    middleware::RequestId,
    telemetry,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { output }) => write_template(output.as_deref()),
        Some(Command::Generate) => generate_once(&cli.config).await,
        Some(Command::Serve) | None => serve(&cli.config).await,
    }
}

fn write_template(output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, generate_config_template())?;
            eprintln!("Wrote template configuration to {}", path);
        }
        None => print!("{}", generate_config_template()),
    }
    Ok(())
}

/// Load config, start logging, read API keys
fn bootstrap(config_path: &str) -> Result<(Arc<Config>, ApiKeys), Box<dyn std::error::Error>> {
    let loaded = Config::load_if_exists(config_path)?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();
    telemetry::init(&config.observability.log_level);

    if !found {
        tracing::info!(
            path = config_path,
            "Config file not found, using built-in defaults"
        );
    }

    let keys = ApiKeys::from_env();
    tracing::info!(
        openai = keys.openai().is_some(),
        gemini = keys.gemini().is_some(),
        "Provider keys loaded from environment"
    );

    Ok((Arc::new(config), keys))
}

async fn generate_once(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (config, keys) = bootstrap(config_path)?;
    let state = AppState::new(config, &keys)?;

    let outcome = state.generator().generate(RequestId::new()).await;
    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);

    if outcome.status().is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

async fn serve(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (config, keys) = bootstrap(config_path)?;

    tracing::info!(
        "Starting awsquiz server on {}:{}",
        config.server.host,
        config.server.port
    );

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    let state = AppState::new(config, &keys)?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Quiz endpoint available at http://{}/api/quiz", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
