//! Shared Dictionary Store
//!
//! This module implements the word → definition table that every client
//! connection reads and mutates.
//!
//! ## Design Decisions
//!
//! 1. **One Lock**: The whole table sits behind a single `Mutex`. Every public
//!    operation is one transaction: it takes the lock, does its work and
//!    releases it before returning. Nothing awaits while the lock is held.
//! 2. **Insertion Order**: Entries live in a `Vec`, so listing order is the
//!    order words were added and deletion shifts the tail down.
//! 3. **Bounded Strings**: Words and definitions are truncated to
//!    [`MAX_WORD_LEN`] / [`MAX_DEFINITION_LEN`] bytes at a character boundary.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DictionaryStore                         │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                  Mutex<Table>                         │  │
//! │  │  initialized: bool                                    │  │
//! │  │  entries: [ apple | pear | plum | ... ] (≤ capacity)  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!        ▲            ▲             ▲
//!        │            │             │
//!   connection 1  connection 2  connection N
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Maximum number of entries the dictionary holds by default.
pub const DEFAULT_CAPACITY: usize = 100;

/// Maximum length of a word in bytes.
pub const MAX_WORD_LEN: usize = 19;

/// Maximum length of a definition in bytes.
pub const MAX_DEFINITION_LEN: usize = 255;

/// Errors returned by dictionary operations.
///
/// All of these are recoverable: the connection reports them to the client
/// and keeps going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The dictionary has not been initialized yet
    #[error("dictionary not initialized")]
    NotInitialized,

    /// The word is already present
    #[error("word '{0}' already exists")]
    Duplicate(String),

    /// The word is not present
    #[error("word '{0}' not found")]
    NotFound(String),

    /// The dictionary already holds `capacity` words
    #[error("dictionary is full ({0} words)")]
    CapacityExceeded(usize),

    /// An empty word cannot be stored
    #[error("empty word")]
    EmptyWord,
}

/// Result type for dictionary operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of [`DictionaryStore::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// First initialization since the server started
    Initialized,
    /// The dictionary was already initialized and has been cleared
    Reinitialized,
}

/// A single word and its definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: String,
    pub definition: String,
}

impl DictionaryEntry {
    fn new(word: String) -> Self {
        Self {
            word,
            definition: String::new(),
        }
    }
}

/// A point-in-time copy of the dictionary contents, in insertion order.
///
/// Iterating borrows the listing, so the same snapshot can be walked as
/// many times as needed. It never touches the live store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<DictionaryEntry>,
}

impl Listing {
    /// Returns an iterator over `(word, definition)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|e| (e.word.as_str(), e.definition.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a DictionaryEntry;
    type IntoIter = std::slice::Iter<'a, DictionaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Operation counters, updated outside the table lock.
#[derive(Debug, Default)]
struct OpCounters {
    adds: AtomicU64,
    definitions: AtomicU64,
    deletes: AtomicU64,
    lists: AtomicU64,
    initializations: AtomicU64,
    rejected: AtomicU64,
}

/// Dictionary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub words: usize,
    pub capacity: usize,
    pub adds: u64,
    pub definitions: u64,
    pub deletes: u64,
    pub lists: u64,
    pub initializations: u64,
    pub rejected: u64,
}

/// The guarded state.
#[derive(Debug)]
struct Table {
    initialized: bool,
    entries: Vec<DictionaryEntry>,
}

impl Table {
    fn position(&self, word: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.word == word)
    }
}

/// The shared dictionary.
///
/// Wrap it in an `Arc` and hand a clone to every connection task.
///
/// # Example
///
/// ```
/// use dictd::storage::{DictionaryStore, StoreError};
///
/// let store = DictionaryStore::new();
/// assert_eq!(store.add("apple"), Err(StoreError::NotInitialized));
///
/// store.initialize();
/// store.add("apple").unwrap();
/// store.set_definition("apple", "a fruit").unwrap();
///
/// let listing = store.list().unwrap();
/// assert_eq!(listing.iter().collect::<Vec<_>>(), vec![("apple", "a fruit")]);
/// ```
pub struct DictionaryStore {
    table: Mutex<Table>,
    capacity: usize,
    counters: OpCounters,
}

impl std::fmt::Debug for DictionaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryStore")
            .field("words", &self.len())
            .field("capacity", &self.capacity)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Default for DictionaryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryStore {
    /// Creates an uninitialized store with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an uninitialized store holding at most `capacity` words.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Mutex::new(Table {
                initialized: false,
                entries: Vec::with_capacity(capacity),
            }),
            capacity,
            counters: OpCounters::default(),
        }
    }

    /// Takes the table lock.
    ///
    /// Every operation leaves the table consistent before anything that can
    /// panic, so a poisoned lock still guards valid data.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn reject<T>(&self, err: StoreError) -> StoreResult<T> {
        self.counters.rejected.fetch_add(1, Ordering::Relaxed);
        Err(err)
    }

    /// Clears the dictionary and marks it initialized.
    pub fn initialize(&self) -> InitOutcome {
        self.counters.initializations.fetch_add(1, Ordering::Relaxed);

        let mut table = self.lock();
        table.entries.clear();

        if std::mem::replace(&mut table.initialized, true) {
            InitOutcome::Reinitialized
        } else {
            InitOutcome::Initialized
        }
    }

    /// Appends `word` with an empty definition.
    ///
    /// The word is truncated to [`MAX_WORD_LEN`] bytes before the duplicate
    /// check. Returns the stored form of the word.
    pub fn add(&self, word: &str) -> StoreResult<String> {
        let word = truncate(word, MAX_WORD_LEN);

        let mut table = self.lock();
        if !table.initialized {
            drop(table);
            return self.reject(StoreError::NotInitialized);
        }
        if word.is_empty() {
            drop(table);
            return self.reject(StoreError::EmptyWord);
        }
        if table.position(word).is_some() {
            drop(table);
            return self.reject(StoreError::Duplicate(word.to_string()));
        }
        if table.entries.len() >= self.capacity {
            drop(table);
            return self.reject(StoreError::CapacityExceeded(self.capacity));
        }

        table.entries.push(DictionaryEntry::new(word.to_string()));
        drop(table);

        self.counters.adds.fetch_add(1, Ordering::Relaxed);
        Ok(word.to_string())
    }

    /// Overwrites the definition of an existing word.
    ///
    /// The definition is truncated to [`MAX_DEFINITION_LEN`] bytes. Returns
    /// the stored form of the word.
    pub fn set_definition(&self, word: &str, definition: &str) -> StoreResult<String> {
        let word = truncate(word, MAX_WORD_LEN);
        let definition = truncate(definition, MAX_DEFINITION_LEN);

        let mut table = self.lock();
        if !table.initialized {
            drop(table);
            return self.reject(StoreError::NotInitialized);
        }
        let Some(index) = table.position(word) else {
            drop(table);
            return self.reject(StoreError::NotFound(word.to_string()));
        };

        let entry = &mut table.entries[index];
        entry.definition.clear();
        entry.definition.push_str(definition);
        drop(table);

        self.counters.definitions.fetch_add(1, Ordering::Relaxed);
        Ok(word.to_string())
    }

    /// Removes a word, keeping the remaining entries in order.
    ///
    /// Returns the word as it was stored.
    pub fn delete(&self, word: &str) -> StoreResult<String> {
        let word = truncate(word, MAX_WORD_LEN);

        let mut table = self.lock();
        if !table.initialized {
            drop(table);
            return self.reject(StoreError::NotInitialized);
        }
        let Some(index) = table.position(word) else {
            drop(table);
            return self.reject(StoreError::NotFound(word.to_string()));
        };

        // Vec::remove shifts the tail left, preserving order.
        let removed = table.entries.remove(index);
        drop(table);

        self.counters.deletes.fetch_add(1, Ordering::Relaxed);
        Ok(removed.word)
    }

    /// Returns a snapshot of all entries in insertion order.
    pub fn list(&self) -> StoreResult<Listing> {
        let table = self.lock();
        if !table.initialized {
            drop(table);
            return self.reject(StoreError::NotInitialized);
        }
        let entries = table.entries.clone();
        drop(table);

        self.counters.lists.fetch_add(1, Ordering::Relaxed);
        Ok(Listing { entries })
    }

    /// Returns true once [`initialize`](Self::initialize) has been called.
    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Returns the number of words currently stored.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns dictionary statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            words: self.len(),
            capacity: self.capacity,
            adds: self.counters.adds.load(Ordering::Relaxed),
            definitions: self.counters.definitions.load(Ordering::Relaxed),
            deletes: self.counters.deletes.load(Ordering::Relaxed),
            lists: self.counters.lists.load(Ordering::Relaxed),
            initializations: self.counters.initializations.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Cuts `s` to at most `max` bytes without splitting a character.
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
