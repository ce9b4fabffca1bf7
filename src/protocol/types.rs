//! Dictionary Protocol Types
//!
//! The protocol is plain text, one command per line.
//!
//! ## Request Format
//!
//! A request line starts with a single command character, optionally followed
//! by one space and an argument that runs to the end of the line:
//!
//! ```text
//! i                 initialize / reset the dictionary
//! a apple           add a word (also `A apple`)
//! d apple           set a definition; the server then prompts for it
//! s apple           delete a word
//! p                 print every word and definition
//! close             end the session
//! ```
//!
//! ## Response Format
//!
//! Every processed line gets one reply line, followed by an echo of the line
//! the client sent:
//!
//! ```text
//! Word 'apple' added successfully.\n
//! a apple\n
//! ```
//!
//! The definition prompt is the one reply that is sent on its own.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// The line terminator used on the wire.
pub const LF: &[u8] = b"\n";

/// Sent after `d <word>`, before the definition line is read.
pub const DEFINITION_PROMPT: &str = "Enter your definition:";

/// The exact line that ends a session.
pub const CLOSE_LINE: &str = "close";

/// A parsed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `a <word>` / `A <word>`
    Add(String),
    /// `d <word>`, completed by a follow-up definition line
    Define(String),
    /// `s <word>`
    Delete(String),
    /// `i`
    Initialize,
    /// `p`
    Print,
    /// `close`
    Close,
    /// Anything else; carries the raw line
    Unknown(String),
}

impl Command {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add(_) => "add",
            Command::Define(_) => "define",
            Command::Delete(_) => "delete",
            Command::Initialize => "initialize",
            Command::Print => "print",
            Command::Close => "close",
            Command::Unknown(_) => "unknown",
        }
    }
}

/// A response sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Result text for a processed line
    Message(String),
    /// The definition prompt
    Prompt,
}

impl Reply {
    /// Creates a message reply.
    pub fn message(text: impl Into<String>) -> Self {
        Reply::Message(text.into())
    }

    /// Creates the definition prompt.
    pub fn prompt() -> Self {
        Reply::Prompt
    }

    /// Returns the reply text without terminator.
    pub fn text(&self) -> &str {
        match self {
            Reply::Message(text) => text,
            Reply::Prompt => DEFINITION_PROMPT,
        }
    }

    /// Returns true for the definition prompt.
    pub fn is_prompt(&self) -> bool {
        matches!(self, Reply::Prompt)
    }

    /// Serializes the reply into wire bytes.
    ///
    /// Messages are followed by `echo` on its own line when one is given.
    /// The prompt is never echoed.
    pub fn serialize(&self, echo: Option<&str>) -> Bytes {
        let text = self.text();
        let mut buf = BytesMut::with_capacity(text.len() + 2 + echo.map_or(0, str::len));

        buf.put_slice(text.as_bytes());
        buf.put_slice(LF);

        if let (Reply::Message(_), Some(echo)) = (self, echo) {
            buf.put_slice(echo.as_bytes());
            buf.put_slice(LF);
        }

        buf.freeze()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_message_with_echo() {
        let reply = Reply::message("Dictionary initialized");
        assert_eq!(
            reply.serialize(Some("i")),
            Bytes::from("Dictionary initialized\ni\n")
        );
    }

    #[test]
    fn test_serialize_message_without_echo() {
        let reply = Reply::message("Dictionary initialized");
        assert_eq!(reply.serialize(None), Bytes::from("Dictionary initialized\n"));
    }

    #[test]
    fn test_prompt_is_never_echoed() {
        let reply = Reply::prompt();
        assert!(reply.is_prompt());
        assert_eq!(
            reply.serialize(Some("d apple")),
            Bytes::from("Enter your definition:\n")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Reply::message("hi").to_string(), "hi");
        assert_eq!(Reply::prompt().to_string(), DEFINITION_PROMPT);
    }
}
