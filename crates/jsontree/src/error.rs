//! Error types for parsing, serializing and mutating a JSON tree.

use thiserror::Error;

/// Why a piece of input text could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input was empty or contained only whitespace.
    #[error("empty input")]
    Empty,

    /// The input ended in the middle of a value.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A byte that cannot start or continue the current construct.
    #[error("unexpected byte 0x{0:02x}")]
    UnexpectedByte(u8),

    /// Something that started like `true`, `false` or `null` but was not.
    #[error("invalid literal")]
    InvalidLiteral,

    /// A number that does not follow the JSON number grammar.
    #[error("invalid number")]
    InvalidNumber,

    /// A well-formed number whose value does not fit a finite double.
    #[error("number out of range")]
    NumberOutOfRange,

    /// A backslash followed by something other than a JSON escape.
    #[error("invalid escape sequence")]
    InvalidEscape,

    /// A malformed `\uXXXX` escape or an unpaired surrogate.
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,

    /// A raw control character (below 0x20) inside a string literal.
    #[error("control character in string")]
    ControlCharacterInString,

    /// String contents that are not valid UTF-8.
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    /// A complete value was followed by more non-whitespace input.
    #[error("trailing characters after value")]
    TrailingCharacters,

    /// Arrays/objects nested deeper than the configured limit.
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// A parse failure, located by the byte offset where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at byte {offset}: {reason}")]
pub struct ParseError {
    pub offset: usize,
    pub reason: ParseErrorKind,
}

/// Errors that can occur while working with a [`Document`](crate::Document).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Input text was not valid JSON.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The handle refers to a node that has been destroyed.
    #[error("stale node handle")]
    StaleHandle,

    /// The key kind does not match the container (e.g. a string key on an array).
    #[error("invalid key type: {container} containers cannot be indexed by {key}")]
    InvalidKeyType {
        container: &'static str,
        key: &'static str,
    },

    /// Attaching the node would make it its own ancestor.
    #[error("attaching this node would create a cycle")]
    CycleDetected,

    /// A container was required but a primitive was given, or vice versa.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An array write outside `0..len`.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// The node is owned by a container and cannot be destroyed on its own.
    #[error("node is attached to a container; destroy or detach its owner instead")]
    Attached,
}

/// Convenience alias used throughout jsontree.
pub type Result<T> = std::result::Result<T, TreeError>;
