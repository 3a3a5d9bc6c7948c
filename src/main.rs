use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod access;
mod ai;
mod auth;
mod cli;
mod config;
mod error;
mod files;
mod handlers;
mod planner;
mod router;
mod schemas;
mod strava;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

/// Main entry point for the Etape Training Hub backend.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "etape=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();
    cli.run().await
}
