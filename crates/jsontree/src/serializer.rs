//! Value tree → compact JSON text.
//!
//! Output has no whitespace between tokens, object keys appear in insertion
//! order, and the same tree always produces byte-identical text:
//!
//! ```
//! use jsontree::Document;
//!
//! let mut doc = Document::new();
//! let root = doc.decode("{ \"b\" : [1.50, true] , \"a\" : null }").unwrap();
//! assert_eq!(doc.encode(root).unwrap(), r#"{"b":[1.5,true],"a":null}"#);
//! ```

use crate::arena::Payload;
use crate::document::Document;
use crate::error::Result;
use crate::types::NodeId;

/// Largest magnitude below which whole numbers are written without a
/// fraction or exponent (2^53, the end of the exactly representable range).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Document {
    /// Serialize the tree rooted at `id` to compact JSON.
    ///
    /// `id` may be a root or any node inside a tree; only its subtree is
    /// written.
    pub fn encode(&self, id: NodeId) -> Result<String> {
        let mut out = String::new();
        self.encode_into(id, &mut out)?;
        tracing::debug!(node = %id, bytes = out.len(), "encoded tree");
        Ok(out)
    }

    /// Serialize the tree rooted at `id`, appending to `out`.
    pub fn encode_into(&self, id: NodeId, out: &mut String) -> Result<()> {
        // Explicit work stack: trees built through `set` have no depth limit.
        let mut work = vec![Work::Node(id)];
        while let Some(item) = work.pop() {
            match item {
                Work::Text(text) => out.push_str(text),
                Work::Node(node) => match &self.node(node)?.payload {
                    Payload::Null => out.push_str("null"),
                    Payload::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
                    Payload::Number(n) => out.push_str(&format_number(*n)),
                    Payload::String(s) => write_string(s, out),
                    Payload::Array(items) => {
                        out.push('[');
                        work.push(Work::Text("]"));
                        for (i, child) in items.iter().enumerate().rev() {
                            work.push(Work::Node(*child));
                            if i > 0 {
                                work.push(Work::Text(","));
                            }
                        }
                    }
                    Payload::Object(entries) => {
                        out.push('{');
                        work.push(Work::Text("}"));
                        for (i, (key, child)) in entries.iter().enumerate().rev() {
                            work.push(Work::Node(*child));
                            work.push(Work::Key(key));
                            if i > 0 {
                                work.push(Work::Text(","));
                            }
                        }
                    }
                },
                Work::Key(key) => {
                    write_string(key, out);
                    out.push(':');
                }
            }
        }
        Ok(())
    }
}

/// Pending output, popped in reverse push order.
enum Work<'a> {
    Node(NodeId),
    Key(&'a str),
    Text(&'static str),
}

/// Format a number for JSON output.
///
/// - Whole numbers below 2^53 in magnitude are written as integers (`3.0` → `3`)
/// - Negative zero normalizes to `0`
/// - Everything else uses the shortest text that parses back to the same
///   double, without a trailing `.0`
/// - NaN and infinities, which JSON cannot express, become `null`
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    if let Some(int) = exact_integer(n) {
        return int.to_string();
    }
    let mut buf = ryu::Buffer::new();
    let text = buf.format_finite(n);
    text.strip_suffix(".0").unwrap_or(text).to_string()
}

/// `n` as an integer if it is whole and below 2^53 in magnitude. Negative
/// zero maps to `0`.
pub(crate) fn exact_integer(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

/// Write a quoted, escaped JSON string. Non-ASCII text passes through as-is.
fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
