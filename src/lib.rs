//! # dictd - A Shared Dictionary Server
//!
//! dictd serves a single in-memory word → definition dictionary to any number
//! of concurrent TCP clients over a line-oriented text protocol.
//!
//! ## Features
//!
//! - **Shared Store**: every client reads and writes the same dictionary
//! - **Atomic Operations**: one lock makes each command an indivisible transaction
//! - **Idle Timeout**: silent clients are disconnected after a fixed window
//! - **Async I/O**: built on Tokio, one task per connection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               dictd                                     │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │                     ┌─────────────┐    ┌──────────────────────────────┐ │
//! │                     │   Line      │    │       DictionaryStore        │ │
//! │                     │   Parser    │    │  Mutex<[word, definition]>   │ │
//! │                     └─────────────┘    └──────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use dictd::connection::{ConnectionStats, SessionConfig};
//! use dictd::server::accept_loop;
//! use dictd::storage::DictionaryStore;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(DictionaryStore::new());
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = TcpListener::bind("0.0.0.0:5001").await.unwrap();
//!     accept_loop(listener, store, stats, SessionConfig::default()).await;
//! }
//! ```
//!
//! ## Protocol
//!
//! - `i` - initialize (or reset) the dictionary
//! - `a <word>` / `A <word>` - add a word
//! - `d <word>` - define a word; the server prompts, the next line is the definition
//! - `s <word>` - delete a word
//! - `p` - print all words and definitions
//! - `close` - end the session
//!
//! Every reply is followed by an echo of the line that produced it.
//!
//! ## Module Overview
//!
//! - [`protocol`]: line framing, command parsing and reply types
//! - [`storage`]: the shared dictionary store
//! - [`commands`]: command execution against the store
//! - [`connection`]: per-client session state machine
//! - [`server`]: the accept loop
//! - [`config`]: command-line and environment configuration

use std::time::Duration;

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use config::Config;
pub use connection::{handle_connection, ConnectionStats, SessionConfig};
pub use protocol::{parse_command, Command, LineParser, ParseError, Reply};
pub use storage::{DictionaryStore, StoreError};

/// The default port dictd listens on
pub const DEFAULT_PORT: u16 = 5001;

/// The default host dictd binds to (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// How long a client may stay silent before being disconnected
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Version of dictd
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
