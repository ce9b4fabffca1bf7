//! Dictionary Protocol Implementation
//!
//! This module implements the line-oriented text protocol spoken between
//! clients and the dictionary server.
//!
//! ## Overview
//!
//! Each request is one line: a command character, optionally a space and an
//! argument. Each response is one line of text followed by an echo of the
//! request line.
//!
//! ## Modules
//!
//! - `types`: Defines `Command`, `Reply` and reply serialization
//! - `parser`: Line framing and command decoding
//!
//! ## Example
//!
//! ```
//! use dictd::protocol::{parse_message, Command, Reply};
//!
//! let (command, consumed) = parse_message(b"a apple\n").unwrap().unwrap();
//! assert_eq!(command, Command::Add("apple".to_string()));
//! assert_eq!(consumed, 8);
//!
//! let bytes = Reply::message("Word 'apple' added successfully.").serialize(Some("a apple"));
//! assert_eq!(&bytes[..], b"Word 'apple' added successfully.\na apple\n");
//! ```

pub mod parser;
pub mod types;

pub use parser::{
    parse_command, parse_message, LineParser, ParseError, ParseResult, MAX_LINE_LENGTH,
};
pub use types::{Command, Reply, CLOSE_LINE, DEFINITION_PROMPT};
