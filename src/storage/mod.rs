//! Storage Module
//!
//! This module provides the shared dictionary that all client connections
//! operate on.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DictionaryStore                         │
//! │                                                             │
//! │   initialize ─┐                                             │
//! │   add ────────┤                                             │
//! │   set_def ────┼──> Mutex<Table> ──> [entry, entry, ...]     │
//! │   delete ─────┤                                             │
//! │   list ───────┘                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Whole-Store Locking**: every operation is one indivisible transaction
//! - **Insertion Order**: listing returns words in the order they were added
//! - **Bounded**: a fixed word capacity plus byte limits on words and definitions
//!
//! ## Example
//!
//! ```
//! use dictd::storage::{DictionaryStore, InitOutcome};
//! use std::sync::Arc;
//!
//! let store = Arc::new(DictionaryStore::new());
//! assert_eq!(store.initialize(), InitOutcome::Initialized);
//!
//! store.add("A").unwrap();
//! store.add("B").unwrap();
//! store.add("C").unwrap();
//! store.delete("B").unwrap();
//!
//! let words: Vec<_> = store.list().unwrap().iter().map(|(w, _)| w.to_string()).collect();
//! assert_eq!(words, vec!["A", "C"]);
//! ```

pub mod dictionary;

pub use dictionary::{
    DictionaryEntry, DictionaryStore, InitOutcome, Listing, StoreError, StoreResult, StoreStats,
    DEFAULT_CAPACITY, MAX_DEFINITION_LEN, MAX_WORD_LEN,
};
