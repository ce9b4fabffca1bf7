//! dictd - Shared Dictionary Server
//!
//! This is the main entry point for the dictd server.
//! It sets up logging, the shared store, the TCP listener, and runs the
//! accept loop until Ctrl+C.

use anyhow::Context;
use clap::Parser;
use dictd::config::Config;
use dictd::connection::ConnectionStats;
use dictd::server;
use dictd::storage::DictionaryStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn print_banner(config: &Config) {
    println!(
        r#"
dictd v{} - Shared Dictionary Server
──────────────────────────────────────────────────────────────
Server started on {}
Capacity: {} words, idle timeout: {:?}
Ready to accept connections.

Use Ctrl+C to shutdown gracefully.
"#,
        dictd::VERSION,
        config.bind_address(),
        config.capacity,
        config.idle_timeout,
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments and environment
    let config = Config::parse();

    // Set up logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Create the dictionary (shared across all connections)
    let store = Arc::new(DictionaryStore::with_capacity(config.capacity));
    info!(capacity = config.capacity, "Dictionary store created");

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!("Listening on {}", config.bind_address());

    print_banner(&config);

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    server::serve(
        listener,
        Arc::clone(&store),
        Arc::clone(&stats),
        config.session(),
        shutdown,
    )
    .await;

    let store_stats = store.stats();
    info!(
        connections = stats.connections_accepted.load(Ordering::Relaxed),
        commands = stats.commands_processed.load(Ordering::Relaxed),
        idle_timeouts = stats.idle_timeouts.load(Ordering::Relaxed),
        words = store_stats.words,
        rejected = store_stats.rejected,
        "Server shutdown complete"
    );
    Ok(())
}
