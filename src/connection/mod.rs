//! Connection Handler Module
//!
//! This module manages individual client connections to the dictionary
//! server. Each client connection is handled by its own async task, so a slow
//! or idle client never holds up the others or the listener.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TCP Listener                            │
//! │                    (server.rs)                              │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │
//!                        │ accept()
//!                        ▼
//!           ┌────────────────────────┐
//!           │   For each client...   │
//!           └────────────┬───────────┘
//!                        │
//!                        │ spawn task
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ConnectionHandler                           │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ Read line   │───>│ Parse line  │───>│ Execute cmd │     │
//! │  │ (timeout)   │    └─────────────┘    └─────────────┘     │
//! │  └─────────────┘                              │             │
//! │                                               ▼             │
//! │                                      ┌─────────────────┐    │
//! │                                      │ Reply + echo    │    │
//! │                                      └─────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Async I/O**: Uses Tokio for non-blocking network operations
//! - **Idle Timeout**: Silent clients are disconnected after the idle window
//! - **Two-Step Definitions**: `d <word>` prompts for the definition line
//! - **Statistics**: Tracks connection and command metrics

pub mod handler;

pub use handler::{
    handle_connection, ConnectionError, ConnectionHandler, ConnectionStats, SessionConfig,
    SessionState,
};
