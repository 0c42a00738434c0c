//! JSON text → value tree.
//!
//! A recursive-descent parser over raw bytes that builds nodes directly in a
//! [`Document`]'s arena. It accepts exactly the JSON grammar:
//!
//! - Any value at the top level, not only objects and arrays
//! - Whitespace between tokens limited to space, tab, newline and carriage return
//! - The standard escape set, with `\uXXXX` surrogate pairs combined
//! - Numbers per the JSON number grammar, stored as `f64`
//!
//! # Key design decisions
//!
//! - **All-or-nothing**: every node the parser allocates is recorded, and on
//!   failure all of them are freed, so a failed decode leaves the document
//!   exactly as it was.
//! - **Byte offsets**: errors report the offset of the byte where parsing
//!   could not continue (the start of the offending token where that is more
//!   useful, e.g. for bad escapes and numbers).
//! - **Duplicate keys** follow the same rule as [`Document::set`]: the later
//!   value replaces the earlier one in its original position.

use std::collections::HashMap;

use crate::arena::Payload;
use crate::document::Document;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::options::ParseOptions;
use crate::types::NodeId;

impl Document {
    /// Parse JSON text into a new root using the default [`ParseOptions`].
    pub fn decode(&mut self, text: impl AsRef<[u8]>) -> Result<NodeId> {
        self.decode_with(text, &ParseOptions::default())
    }

    /// Parse JSON text into a new root.
    ///
    /// On failure nothing is left allocated in the document.
    pub fn decode_with(&mut self, text: impl AsRef<[u8]>, options: &ParseOptions) -> Result<NodeId> {
        let input = text.as_ref();
        let mut parser = Parser {
            input,
            pos: 0,
            depth: 0,
            options: *options,
            doc: self,
            allocated: Vec::new(),
        };
        match parser.parse_document() {
            Ok(root) => {
                tracing::debug!(bytes = input.len(), nodes = parser.allocated.len(), "decoded document");
                Ok(root)
            }
            Err(err) => {
                parser.rollback();
                tracing::debug!(bytes = input.len(), %err, "decode failed");
                Err(err.into())
            }
        }
    }
}

struct Parser<'a, 'd> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
    options: ParseOptions,
    doc: &'d mut Document,
    allocated: Vec<NodeId>,
}

type ParseResult<T> = std::result::Result<T, ParseError>;

impl Parser<'_, '_> {
    fn parse_document(&mut self) -> ParseResult<NodeId> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return Err(self.error_at(self.pos, ParseErrorKind::Empty));
        }
        let root = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error_at(self.pos, ParseErrorKind::TrailingCharacters));
        }
        Ok(root)
    }

    /// Free everything allocated so far. Handles already freed by a
    /// duplicate-key replacement are stale and skipped by the arena.
    fn rollback(&mut self) {
        for id in self.allocated.drain(..) {
            self.doc.arena.free(id);
        }
    }

    fn alloc(&mut self, payload: Payload) -> NodeId {
        let id = self.doc.arena.alloc(payload);
        self.allocated.push(id);
        id
    }

    fn error_at(&self, offset: usize, reason: ParseErrorKind) -> ParseError {
        ParseError { offset, reason }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Error for a byte that cannot appear here, or for running out of input.
    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(b) => self.error_at(self.pos, ParseErrorKind::UnexpectedByte(b)),
            None => self.error_at(self.pos, ParseErrorKind::UnexpectedEnd),
        }
    }

    fn parse_value(&mut self) -> ParseResult<NodeId> {
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => {
                let s = self.parse_string()?;
                Ok(self.alloc(Payload::String(s)))
            }
            Some(b't') => self.parse_literal(b"true", Payload::Bool(true)),
            Some(b'f') => self.parse_literal(b"false", Payload::Bool(false)),
            Some(b'n') => self.parse_literal(b"null", Payload::Null),
            Some(b'-' | b'0'..=b'9') => {
                let n = self.parse_number()?;
                Ok(self.alloc(Payload::Number(n)))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_literal(&mut self, word: &[u8], payload: Payload) -> ParseResult<NodeId> {
        if !self.input[self.pos..].starts_with(word) {
            return Err(self.error_at(self.pos, ParseErrorKind::InvalidLiteral));
        }
        self.pos += word.len();
        Ok(self.alloc(payload))
    }

    fn enter_container(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error_at(
                self.pos,
                ParseErrorKind::NestingTooDeep(self.options.max_depth),
            ));
        }
        Ok(())
    }

    fn parse_array(&mut self) -> ParseResult<NodeId> {
        self.enter_container()?;
        self.pos += 1; // '['
        let array = self.alloc(Payload::Array(Vec::new()));

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(array);
        }

        loop {
            self.skip_whitespace();
            let item = self.parse_value()?;
            self.push_item(array, item);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }

        self.depth -= 1;
        Ok(array)
    }

    fn parse_object(&mut self) -> ParseResult<NodeId> {
        self.enter_container()?;
        self.pos += 1; // '{'
        let object = self.alloc(Payload::Object(Vec::new()));
        // key → entry position, so duplicate checks stay O(1) per key
        let mut positions: HashMap<String, usize> = HashMap::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(object);
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected());
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return Err(self.unexpected());
            }
            self.pos += 1;

            self.skip_whitespace();
            let value = self.parse_value()?;
            self.insert_entry(object, &mut positions, key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }

        self.depth -= 1;
        Ok(object)
    }

    fn push_item(&mut self, array: NodeId, item: NodeId) {
        if let Some(node) = self.doc.arena.get_mut(item) {
            node.parent = Some(array);
        }
        if let Some(Payload::Array(items)) = self.doc.arena.get_mut(array).map(|n| &mut n.payload) {
            items.push(item);
        }
    }

    fn insert_entry(
        &mut self,
        object: NodeId,
        positions: &mut HashMap<String, usize>,
        key: String,
        value: NodeId,
    ) {
        if let Some(node) = self.doc.arena.get_mut(value) {
            node.parent = Some(object);
        }
        let replaced = match self.doc.arena.get_mut(object).map(|n| &mut n.payload) {
            Some(Payload::Object(entries)) => match positions.get(&key) {
                Some(&at) => Some(std::mem::replace(&mut entries[at].1, value)),
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, value));
                    None
                }
            },
            _ => None,
        };
        if let Some(old) = replaced {
            self.doc.free_subtree(old);
        }
    }

    /// Parse a string literal starting at the opening quote.
    fn parse_string(&mut self) -> ParseResult<String> {
        self.pos += 1; // opening '"'
        let mut out = String::new();

        loop {
            // Copy the longest run of bytes that need no special handling.
            let run_start = self.pos;
            while let Some(b) = self.peek() {
                if b == b'"' || b == b'\\' || b < 0x20 {
                    break;
                }
                self.pos += 1;
            }
            if self.pos > run_start {
                let run = std::str::from_utf8(&self.input[run_start..self.pos]).map_err(|e| {
                    self.error_at(run_start + e.valid_up_to(), ParseErrorKind::InvalidUtf8)
                })?;
                out.push_str(run);
            }

            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => out.push(self.parse_escape()?),
                Some(_) => {
                    return Err(self.error_at(self.pos, ParseErrorKind::ControlCharacterInString))
                }
                None => return Err(self.error_at(self.pos, ParseErrorKind::UnexpectedEnd)),
            }
        }
    }

    /// Parse one escape sequence starting at the backslash.
    fn parse_escape(&mut self) -> ParseResult<char> {
        let start = self.pos;
        self.pos += 1; // '\'
        let Some(b) = self.peek() else {
            return Err(self.error_at(self.pos, ParseErrorKind::UnexpectedEnd));
        };
        self.pos += 1;
        let c = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{08}',
            b'f' => '\u{0c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => return self.parse_unicode_escape(start),
            _ => return Err(self.error_at(start, ParseErrorKind::InvalidEscape)),
        };
        Ok(c)
    }

    /// Decode the code point of a `\u` escape whose `\u` prefix (starting at
    /// `start`) has been consumed, combining a following low surrogate.
    fn parse_unicode_escape(&mut self, start: usize) -> ParseResult<char> {
        let invalid = |p: &Self| p.error_at(start, ParseErrorKind::InvalidUnicodeEscape);

        let first = self.parse_hex4().ok_or_else(|| invalid(self))?;
        let code = match first {
            0xD800..=0xDBFF => {
                if !self.input[self.pos..].starts_with(b"\\u") {
                    return Err(invalid(self));
                }
                self.pos += 2;
                let second = self.parse_hex4().ok_or_else(|| invalid(self))?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(invalid(self));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(invalid(self)),
            _ => first,
        };
        char::from_u32(code).ok_or_else(|| invalid(self))
    }

    fn parse_hex4(&mut self) -> Option<u32> {
        let digits = self.input.get(self.pos..self.pos + 4)?;
        let mut value = 0u32;
        for &d in digits {
            value = value * 16 + (d as char).to_digit(16)?;
        }
        self.pos += 4;
        Some(value)
    }

    fn parse_number(&mut self) -> ParseResult<f64> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.error_at(self.pos, ParseErrorKind::InvalidNumber)),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error_at(self.pos, ParseErrorKind::InvalidNumber));
            }
            self.skip_digits();
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error_at(self.pos, ParseErrorKind::InvalidNumber));
            }
            self.skip_digits();
        }

        let value = std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or_else(|| self.error_at(start, ParseErrorKind::InvalidNumber))?;
        if !value.is_finite() {
            return Err(self.error_at(start, ParseErrorKind::NumberOutOfRange));
        }
        Ok(value)
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }
}
