//! TCP listener.
//!
//! Accepts clients and spawns one task per connection. Every task gets a
//! clone of the same `Arc<DictionaryStore>`; the listener itself keeps no
//! dictionary state and never waits on a connection.

use crate::commands::CommandHandler;
use crate::connection::{handle_connection, ConnectionStats, SessionConfig};
use crate::storage::DictionaryStore;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Loop that accepts incoming connections forever.
///
/// Accept errors are logged and the loop carries on.
pub async fn accept_loop(
    listener: TcpListener,
    store: Arc<DictionaryStore>,
    stats: Arc<ConnectionStats>,
    session: SessionConfig,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let handler = CommandHandler::new(Arc::clone(&store));
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats, session).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Runs the accept loop until `shutdown` completes.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<DictionaryStore>,
    stats: Arc<ConnectionStats>,
    session: SessionConfig,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = accept_loop(listener, store, stats, session) => {}
        _ = shutdown => {
            info!("Shutdown signal received, stopping server...");
        }
    }
}
