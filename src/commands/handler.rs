//! Command Handler Module
//!
//! This module executes parsed dictionary commands against the shared store
//! and turns each outcome into reply text.
//!
//! ## Supported Commands
//!
//! - `a <word>` / `A <word>` - Add a word with an empty definition
//! - `d <word>` - Set a word's definition (two-step, see below)
//! - `s <word>` - Delete a word
//! - `i` - Initialize or reset the dictionary
//! - `p` - Print every word and definition
//! - `close` - End the session
//!
//! ## Two-Step Definitions
//!
//! `d <word>` does not touch the store. It yields
//! [`Outcome::AwaitDefinition`], the connection sends the prompt, and the next
//! line is passed to [`CommandHandler::define`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │   Command   │───>│  execute()  │───>│   Outcome   │     │
//! │  └─────────────┘    └──────┬──────┘    └─────────────┘     │
//! │                            │                                │
//! │                            ▼                                │
//! │                     DictionaryStore                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::protocol::{Command, Reply};
use crate::storage::{DictionaryStore, InitOutcome, Listing, StoreError};
use std::sync::Arc;
use tracing::debug;

/// What the connection should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the reply (plus echo) and wait for the next command
    Reply(Reply),
    /// Send the prompt and read the next line as the definition of `word`
    AwaitDefinition { word: String },
    /// Close the connection without replying
    Close,
}

/// Executes dictionary commands against the shared store.
#[derive(Clone)]
pub struct CommandHandler {
    store: Arc<DictionaryStore>,
}

impl CommandHandler {
    /// Creates a new command handler over the given store.
    pub fn new(store: Arc<DictionaryStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<DictionaryStore> {
        &self.store
    }

    /// Executes a command and returns what the connection should do next.
    pub fn execute(&self, command: Command) -> Outcome {
        match command {
            Command::Add(word) => Outcome::Reply(self.cmd_add(&word)),
            Command::Define(word) => self.cmd_define(word),
            Command::Delete(word) => Outcome::Reply(self.cmd_delete(&word)),
            Command::Initialize => Outcome::Reply(self.cmd_initialize()),
            Command::Print => Outcome::Reply(self.cmd_print()),
            Command::Close => Outcome::Close,
            Command::Unknown(line) => {
                debug!(line = %line, "Unknown command");
                Outcome::Reply(Reply::message(format!("Unknown command '{}'.", line)))
            }
        }
    }

    /// Completes a `d <word>` command with the definition line.
    pub fn define(&self, word: &str, definition: &str) -> Reply {
        match self.store.set_definition(word, definition) {
            Ok(stored) => {
                debug!(word = %stored, "Definition added");
                Reply::message(format!("Definition for '{}' added successfully.", stored))
            }
            Err(e) => error_reply(e),
        }
    }

    fn cmd_add(&self, word: &str) -> Reply {
        match self.store.add(word) {
            Ok(stored) => {
                debug!(word = %stored, "Word added");
                Reply::message(format!("Word '{}' added successfully.", stored))
            }
            Err(e) => error_reply(e),
        }
    }

    fn cmd_define(&self, word: String) -> Outcome {
        // The store re-checks this when the definition arrives; a reset in
        // between is reported then.
        if !self.store.is_initialized() {
            return Outcome::Reply(error_reply(StoreError::NotInitialized));
        }
        Outcome::AwaitDefinition { word }
    }

    fn cmd_delete(&self, word: &str) -> Reply {
        match self.store.delete(word) {
            Ok(stored) => {
                debug!(word = %stored, "Word deleted");
                Reply::message(format!("Word '{}' deleted successfully.", stored))
            }
            Err(e) => error_reply(e),
        }
    }

    fn cmd_initialize(&self) -> Reply {
        match self.store.initialize() {
            InitOutcome::Initialized => Reply::message("Dictionary initialized"),
            InitOutcome::Reinitialized => Reply::message("Dictionary reinitialized"),
        }
    }

    fn cmd_print(&self) -> Reply {
        match self.store.list() {
            Ok(listing) => Reply::message(format_listing(&listing)),
            Err(e) => error_reply(e),
        }
    }
}

/// Renders a listing as `Word: ..\nDefinition: ..` blocks.
fn format_listing(listing: &Listing) -> String {
    if listing.is_empty() {
        return "Dictionary is empty.".to_string();
    }

    listing
        .iter()
        .map(|(word, definition)| format!("Word: {}\nDefinition: {}", word, definition))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Maps a store error to the text the client sees.
fn error_reply(err: StoreError) -> Reply {
    debug!(error = %err, "Command rejected");

    match err {
        StoreError::NotInitialized => Reply::message("Dictionary not initialized!"),
        StoreError::Duplicate(word) => Reply::message(format!("Word '{}' already exists.", word)),
        StoreError::NotFound(word) => Reply::message(format!("Word '{}' not found.", word)),
        StoreError::CapacityExceeded(capacity) => {
            Reply::message(format!("Dictionary is full ({} words).", capacity))
        }
        StoreError::EmptyWord => Reply::message("No word given."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_command;

    fn create_handler() -> CommandHandler {
        let store = Arc::new(DictionaryStore::new());
        CommandHandler::new(store)
    }

    fn run(handler: &CommandHandler, line: &str) -> Outcome {
        handler.execute(parse_command(line))
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(reply) => reply.text().to_string(),
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    #[test]
    fn test_not_initialized() {
        let handler = create_handler();

        for line in ["a apple", "d apple", "s apple", "p"] {
            assert_eq!(text(run(&handler, line)), "Dictionary not initialized!");
        }
    }

    #[test]
    fn test_initialize_and_reinitialize() {
        let handler = create_handler();

        assert_eq!(text(run(&handler, "i")), "Dictionary initialized");
        run(&handler, "a apple");
        assert_eq!(text(run(&handler, "i")), "Dictionary reinitialized");
        assert!(handler.store().is_empty());
    }

    #[test]
    fn test_add() {
        let handler = create_handler();
        run(&handler, "i");

        assert_eq!(
            text(run(&handler, "a apple")),
            "Word 'apple' added successfully."
        );
        assert_eq!(
            text(run(&handler, "A apple")),
            "Word 'apple' already exists."
        );
        assert_eq!(text(run(&handler, "a")), "No word given.");
        assert_eq!(handler.store().len(), 1);
    }

    #[test]
    fn test_add_capacity() {
        let handler = CommandHandler::new(Arc::new(DictionaryStore::with_capacity(2)));
        run(&handler, "i");
        run(&handler, "a one");
        run(&handler, "a two");

        assert_eq!(
            text(run(&handler, "a three")),
            "Dictionary is full (2 words)."
        );
    }

    #[test]
    fn test_define_two_step() {
        let handler = create_handler();
        run(&handler, "i");
        run(&handler, "a apple");

        assert_eq!(
            run(&handler, "d apple"),
            Outcome::AwaitDefinition {
                word: "apple".to_string()
            }
        );
        // Nothing is written until the definition arrives
        assert_eq!(
            handler.store().list().unwrap().iter().next(),
            Some(("apple", ""))
        );

        let reply = handler.define("apple", "a fruit");
        assert_eq!(reply.text(), "Definition for 'apple' added successfully.");
        assert_eq!(
            handler.store().list().unwrap().iter().next(),
            Some(("apple", "a fruit"))
        );
    }

    #[test]
    fn test_define_missing_word() {
        let handler = create_handler();
        run(&handler, "i");

        assert!(matches!(
            run(&handler, "d plum"),
            Outcome::AwaitDefinition { .. }
        ));
        assert_eq!(handler.define("plum", "purple").text(), "Word 'plum' not found.");
    }

    #[test]
    fn test_delete() {
        let handler = create_handler();
        run(&handler, "i");
        run(&handler, "a apple");

        assert_eq!(
            text(run(&handler, "s apple")),
            "Word 'apple' deleted successfully."
        );
        assert_eq!(text(run(&handler, "s apple")), "Word 'apple' not found.");
    }

    #[test]
    fn test_replies_name_the_stored_word() {
        let handler = create_handler();
        run(&handler, "i");
        let long = "a abcdefghijklmnopqrstuvwxyz";

        assert_eq!(
            text(run(&handler, long)),
            "Word 'abcdefghijklmnopqrs' added successfully."
        );
        assert_eq!(
            handler.define("abcdefghijklmnopqrstuvwxyz", "letters").text(),
            "Definition for 'abcdefghijklmnopqrs' added successfully."
        );
        assert_eq!(
            text(run(&handler, "s abcdefghijklmnopqrstuvwxyz")),
            "Word 'abcdefghijklmnopqrs' deleted successfully."
        );
    }

    #[test]
    fn test_print() {
        let handler = create_handler();
        run(&handler, "i");
        assert_eq!(text(run(&handler, "p")), "Dictionary is empty.");

        run(&handler, "a apple");
        run(&handler, "a pear");
        handler.define("apple", "a fruit");

        assert_eq!(
            text(run(&handler, "p")),
            "Word: apple\nDefinition: a fruit\nWord: pear\nDefinition: "
        );
    }

    #[test]
    fn test_close() {
        let handler = create_handler();
        assert_eq!(run(&handler, "close"), Outcome::Close);
    }

    #[test]
    fn test_unknown_command() {
        let handler = create_handler();
        assert_eq!(text(run(&handler, "x foo")), "Unknown command 'x foo'.");
        assert_eq!(text(run(&handler, "")), "Unknown command ''.");
    }
}
