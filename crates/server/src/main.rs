mod cli;
mod render;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use common::Config;
use scheduler::RefreshScheduler;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    let _ = dotenv::dotenv();

    // Configure tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    let cache = Arc::new(hacker_news::build_cache(&config)?);

    // Fill the cache before the first reader shows up.
    let warm = cache.clone();
    tokio::spawn(async move {
        if let Err(e) = warm.refresh().await {
            warn!("Initial cache fill failed: {}", e);
        }
    });

    let mut scheduler = match config.refresh_interval {
        Some(every) => {
            let mut scheduler = RefreshScheduler::new().await?;
            scheduler.add_cache_warmer(cache.clone(), every).await?;
            scheduler.start().await?;
            Some(scheduler)
        }
        None => None,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving {} top stories on http://{}", config.num_stories, addr);

    axum::serve(listener, routes::router(cache))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received interrupt signal, shutting down..."),
        Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
    }
}
