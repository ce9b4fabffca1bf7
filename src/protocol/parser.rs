//! Line Framing and Command Parser
//!
//! This module turns raw socket bytes into [`Command`] values in two steps:
//!
//! 1. **Framing**: [`LineParser::parse`] finds the next `\n` in the read
//!    buffer and returns the line without its terminator (a trailing `\r` is
//!    dropped too), plus the number of bytes consumed.
//! 2. **Decoding**: [`parse_command`] reads the command character and the
//!    optional argument.
//!
//! Framing follows the same contract as an incremental parser:
//! - `Ok(Some((line, consumed)))` - a complete line is available
//! - `Ok(None)` - no newline yet, read more data
//! - `Err(ParseError)` - the pending line outgrew the size limit before its
//!   newline arrived
//!
//! Lines are never rejected for their length. A complete line is cut to the
//! limit; for an unterminated one the caller keeps [`LineParser::head`] and
//! drops everything up to the next newline.

use crate::protocol::types::{Command, CLOSE_LINE};
use thiserror::Error;

/// Errors that can occur while framing input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No newline within the allowed line length
    #[error("line too long: {size} bytes (max: {max})")]
    LineTooLong { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Bytes of one request line that are kept, terminator excluded (8 KB).
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Splits newline-delimited lines off a byte buffer.
///
/// # Example
///
/// ```
/// use dictd::protocol::LineParser;
///
/// let parser = LineParser::new();
/// let buf = b"a apple\r\np";
///
/// let (line, consumed) = parser.parse(buf).unwrap().unwrap();
/// assert_eq!(line, "a apple");
/// assert_eq!(consumed, 9);
///
/// // "p" has no newline yet
/// assert!(parser.parse(&buf[consumed..]).unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LineParser {
    max_line_length: usize,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Creates a parser with the default line limit.
    pub fn new() -> Self {
        Self::with_max_line_length(MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    /// Attempts to take one line from the front of `buf`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. A line longer than the
    /// limit is cut, but `consumed` still covers the whole line.
    pub fn parse(&self, buf: &[u8]) -> ParseResult<Option<(String, usize)>> {
        let Some(pos) = buf.iter().position(|&b| b == b'\n') else {
            if buf.len() > self.max_line_length {
                return Err(ParseError::LineTooLong {
                    size: buf.len(),
                    max: self.max_line_length,
                });
            }
            return Ok(None);
        };

        let content = &buf[..pos];
        let content = content.strip_suffix(b"\r").unwrap_or(content);

        Ok(Some((self.head(content), pos + 1)))
    }

    /// Returns the part of `buf` that is kept as a line.
    pub fn head(&self, buf: &[u8]) -> String {
        let kept = &buf[..buf.len().min(self.max_line_length)];
        String::from_utf8_lossy(kept).into_owned()
    }
}

/// Decodes one request line into a [`Command`].
///
/// The first byte selects the command. If the second byte is a space, the
/// rest of the line is the argument; otherwise the argument is empty, so
/// `apple` parses as an add with no word.
///
/// # Example
///
/// ```
/// use dictd::protocol::{parse_command, Command};
///
/// assert_eq!(parse_command("a apple"), Command::Add("apple".to_string()));
/// assert_eq!(parse_command("i"), Command::Initialize);
/// assert_eq!(parse_command("close"), Command::Close);
/// ```
pub fn parse_command(line: &str) -> Command {
    if line == CLOSE_LINE {
        return Command::Close;
    }

    let mut chars = line.chars();
    let Some(tag) = chars.next() else {
        return Command::Unknown(String::new());
    };

    let rest = chars.as_str();
    let argument = rest.strip_prefix(' ').unwrap_or("").to_string();

    match tag {
        'a' | 'A' => Command::Add(argument),
        'd' => Command::Define(argument),
        's' => Command::Delete(argument),
        'i' => Command::Initialize,
        'p' => Command::Print,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Helper that frames and decodes the first line in `buf`.
pub fn parse_message(buf: &[u8]) -> ParseResult<Option<(Command, usize)>> {
    Ok(LineParser::new()
        .parse(buf)?
        .map(|(line, consumed)| (parse_command(&line), consumed)))
}
