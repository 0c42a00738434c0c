//! # jsontree
//!
//! A mutable, in-memory JSON document model with explicit ownership.
//!
//! All nodes live in a [`Document`] and are addressed through copyable
//! [`NodeId`] handles. Each node is either a free-standing root or owned by
//! exactly one array or object, so trees are always acyclic and every node is
//! destroyed exactly once. Handles to destroyed nodes are detected and
//! rejected rather than dangling.
//!
//! ## Quick start
//!
//! ```rust
//! use jsontree::{Document, Lookup};
//!
//! let mut doc = Document::new();
//!
//! // text → tree
//! let root = doc.decode(r#"{"a":1}"#).unwrap();
//!
//! // replace by key, append a new key
//! doc.set(root, "a", 2).unwrap();
//! doc.set(root, "b", "two").unwrap();
//!
//! // move a freshly built array into the object
//! let list = doc.new_array();
//! doc.push(list, true).unwrap();
//! doc.set(root, "list", list).unwrap();
//! assert_eq!(doc.get(root, "list").unwrap(), Lookup::Node(list));
//!
//! // tree → text
//! assert_eq!(doc.encode(root).unwrap(), r#"{"a":2,"b":"two","list":[true]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`document`]: `Document`, constructors, destroy, detach, duplicate
//! - [`mutation`]: `get` / `set` / `push` / `remove` and ownership transfer
//! - [`parser`]: JSON text → tree
//! - [`serializer`]: tree → compact JSON text
//! - [`interop`]: serde `Serialize` view and `serde_json::Value` import
//! - [`options`]: parser limits
//! - [`error`]: error types
//! - [`types`]: handles, keys, inputs and lookup results

mod arena;
pub mod document;
pub mod error;
pub mod interop;
pub mod mutation;
pub mod options;
pub mod parser;
pub mod serializer;
pub mod types;

pub use document::Document;
pub use error::{ParseError, ParseErrorKind, Result, TreeError};
pub use interop::NodeRef;
pub use options::ParseOptions;
pub use serializer::format_number;
pub use types::{Input, Key, Lookup, NodeId, ValueType};
