//! Command Handler Module
//!
//! This module implements the command processing layer of the dictionary
//! server. It receives parsed commands, executes them against the shared
//! store, and returns the reply (or state change) for the connection.
//!
//! ## Architecture
//!
//! ```text
//! Client Line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Line Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │
//! │  - Execute      │
//! │  - Render reply │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ DictionaryStore │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `a`/`A` add, `d` define, `s` delete, `i` initialize, `p` print, `close`

pub mod handler;

pub use handler::{CommandHandler, Outcome};
