use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;

use app::App;
use commands::Cli;
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Logs go to stderr so stdout stays pipeable JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,moviehub=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    debug!("Using API at {}", config.api_base_url);

    let mut app = App::new(&config)?;
    let output = app.run(cli.command).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
