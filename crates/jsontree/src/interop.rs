//! Bridges between document trees and the serde ecosystem.
//!
//! - [`NodeRef`] borrows a subtree and implements [`serde::Serialize`], so it
//!   can be written by `serde_json` or any other serde format. Serde drives
//!   nested values by recursion, so views deeper than
//!   [`MAX_SERIALIZE_DEPTH`] fail with a serializer error instead of
//!   exhausting the stack.
//! - [`Document::export`] and [`Document::import`] convert to and from
//!   [`serde_json::Value`] with explicit work stacks and accept any depth.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::arena::Payload;
use crate::document::Document;
use crate::error::Result;
use crate::serializer::exact_integer;
use crate::types::NodeId;

/// Deepest nesting a [`NodeRef`] will hand to a serializer.
pub const MAX_SERIALIZE_DEPTH: usize = 256;

/// Borrowed view of one node and its subtree.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
    depth: usize,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    fn child(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            doc: self.doc,
            id,
            depth: self.depth + 1,
        }
    }
}

/// Pending steps of [`Document::export`]. Finished values wait on a separate
/// stack until their container is assembled.
enum Build<'a> {
    Node(NodeId),
    Array(usize),
    Object(&'a [(String, NodeId)]),
}

impl Document {
    /// Borrow `id` as a serializable view.
    pub fn view(&self, id: NodeId) -> Result<NodeRef<'_>> {
        self.node(id)?;
        Ok(NodeRef {
            doc: self,
            id,
            depth: 0,
        })
    }

    /// Convert a subtree into an owned [`serde_json::Value`].
    ///
    /// Whole numbers below 2^53 become JSON integers; NaN and infinities
    /// become `null`, as in [`encode`](Self::encode).
    pub fn export(&self, id: NodeId) -> Result<Value> {
        let mut work = vec![Build::Node(id)];
        let mut values: Vec<Value> = Vec::new();
        while let Some(step) = work.pop() {
            match step {
                Build::Node(node) => match &self.node(node)?.payload {
                    Payload::Array(items) => {
                        work.push(Build::Array(items.len()));
                        work.extend(items.iter().rev().map(|child| Build::Node(*child)));
                    }
                    Payload::Object(entries) => {
                        work.push(Build::Object(entries));
                        work.extend(entries.iter().rev().map(|(_, child)| Build::Node(*child)));
                    }
                    primitive => values.push(primitive_value(primitive)),
                },
                Build::Array(len) => {
                    let items = values.split_off(values.len() - len);
                    values.push(Value::Array(items));
                }
                Build::Object(entries) => {
                    let items = values.split_off(values.len() - entries.len());
                    let map: Map<String, Value> = entries
                        .iter()
                        .map(|(key, _)| key.clone())
                        .zip(items)
                        .collect();
                    values.push(Value::Object(map));
                }
            }
        }
        Ok(values.pop().unwrap_or(Value::Null))
    }

    /// Build a new root from a [`serde_json::Value`]. Numbers become `f64`.
    pub fn import(&mut self, value: &Value) -> NodeId {
        let root = self.import_shallow(value);
        let mut stack = vec![(value, root)];
        while let Some((src, dst)) = stack.pop() {
            match src {
                Value::Array(items) => {
                    for item in items {
                        let child = self.import_shallow(item);
                        self.attach_fresh(dst, None, child);
                        stack.push((item, child));
                    }
                }
                Value::Object(map) => {
                    for (key, item) in map {
                        let child = self.import_shallow(item);
                        self.attach_fresh(dst, Some(key.clone()), child);
                        stack.push((item, child));
                    }
                }
                _ => {}
            }
        }
        root
    }

    /// A fresh root holding `value`'s scalar, or an empty container.
    fn import_shallow(&mut self, value: &Value) -> NodeId {
        match value {
            Value::Null => self.create_null(),
            Value::Bool(b) => self.create_bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => self.create_number(f),
                None => self.create_null(),
            },
            Value::String(s) => self.create_string(s.as_str()),
            Value::Array(_) => self.create_array(),
            Value::Object(_) => self.create_object(),
        }
    }

    /// Attach a just-built root at the end of a container it cannot clash with.
    fn attach_fresh(&mut self, container: NodeId, key: Option<String>, child: NodeId) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(container);
        }
        match (self.arena.get_mut(container).map(|n| &mut n.payload), key) {
            (Some(Payload::Array(items)), None) => items.push(child),
            (Some(Payload::Object(entries)), Some(key)) => entries.push((key, child)),
            _ => {}
        }
    }
}

fn primitive_value(payload: &Payload) -> Value {
    match payload {
        Payload::Bool(b) => Value::Bool(*b),
        Payload::Number(n) => match exact_integer(*n) {
            Some(int) => Value::from(int),
            None => Number::from_f64(*n).map_or(Value::Null, Value::Number),
        },
        Payload::String(s) => Value::String(s.clone()),
        Payload::Null | Payload::Array(_) | Payload::Object(_) => Value::Null,
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.depth > MAX_SERIALIZE_DEPTH {
            return Err(S::Error::custom(format!(
                "nesting deeper than {} levels",
                MAX_SERIALIZE_DEPTH
            )));
        }
        let node = self.doc.node(self.id).map_err(S::Error::custom)?;
        match &node.payload {
            Payload::Null => serializer.serialize_unit(),
            Payload::Bool(b) => serializer.serialize_bool(*b),
            Payload::Number(n) => match exact_integer(*n) {
                Some(int) => serializer.serialize_i64(int),
                None => serializer.serialize_f64(*n),
            },
            Payload::String(s) => serializer.serialize_str(s),
            Payload::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for child in items {
                    seq.serialize_element(&self.child(*child))?;
                }
                seq.end()
            }
            Payload::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, child) in entries {
                    map.serialize_entry(key, &self.child(*child))?;
                }
                map.end()
            }
        }
    }
}
