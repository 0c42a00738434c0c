//! The [`Document`]: owner of every node and entry point of the tree API.
//!
//! A document holds any number of independent trees. Each node is either a
//! root (no owner, held by the caller through its [`NodeId`]) or the child of
//! exactly one array or object. Destroying a root frees its entire subtree;
//! attaching a node to a container transfers ownership to that container.
//!
//! # Example
//! ```
//! use jsontree::{Document, Lookup};
//!
//! let mut doc = Document::new();
//! let root = doc.decode(r#"{"name":"Alice","tags":["a","b"]}"#).unwrap();
//! doc.set(root, "age", 30).unwrap();
//! assert_eq!(doc.get(root, "age").unwrap(), Lookup::Number(30.0));
//! assert_eq!(
//!     doc.encode(root).unwrap(),
//!     r#"{"name":"Alice","tags":["a","b"],"age":30}"#
//! );
//! doc.destroy(root).unwrap();
//! assert_eq!(doc.live_nodes(), 0);
//! ```

use crate::arena::{Arena, Node, Payload};
use crate::error::{Result, TreeError};
use crate::types::{Lookup, NodeId, ValueType};

/// Arena-backed store of JSON value trees.
///
/// Not internally synchronized: a document and all of its trees belong to
/// one thread of control at a time. Wrap it in a single lock if it has to be
/// shared.
#[derive(Debug, Default)]
pub struct Document {
    pub(crate) arena: Arena,
}

impl Document {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    // ------------------------------------------------------------------
    // Constructors. Every one of them returns a fresh root.
    // ------------------------------------------------------------------

    pub fn create_null(&mut self) -> NodeId {
        self.arena.alloc(Payload::Null)
    }

    pub fn create_bool(&mut self, value: bool) -> NodeId {
        self.arena.alloc(Payload::Bool(value))
    }

    pub fn create_number(&mut self, value: f64) -> NodeId {
        self.arena.alloc(Payload::Number(value))
    }

    pub fn create_string(&mut self, value: impl Into<String>) -> NodeId {
        self.arena.alloc(Payload::String(value.into()))
    }

    pub fn create_array(&mut self) -> NodeId {
        self.arena.alloc(Payload::Array(Vec::new()))
    }

    pub fn create_object(&mut self) -> NodeId {
        self.arena.alloc(Payload::Object(Vec::new()))
    }

    /// Alias of [`create_array`](Self::create_array) for host bindings.
    pub fn new_array(&mut self) -> NodeId {
        self.create_array()
    }

    /// Alias of [`create_object`](Self::create_object) for host bindings.
    pub fn new_object(&mut self) -> NodeId {
        self.create_object()
    }

    // ------------------------------------------------------------------
    // Destruction and ownership
    // ------------------------------------------------------------------

    /// Destroy a root and everything it owns.
    ///
    /// Fails with [`TreeError::Attached`] if the node currently belongs to a
    /// container; in that case its owner governs its lifetime and nothing is
    /// freed. Destroying an already destroyed handle fails with
    /// [`TreeError::StaleHandle`].
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if self.node(id)?.parent.is_some() {
            return Err(TreeError::Attached);
        }
        let freed = self.free_subtree(id);
        tracing::trace!(node = %id, freed, "destroyed tree");
        Ok(())
    }

    /// Detach a node from its container, making it a root again.
    ///
    /// The node and its subtree survive; the caller becomes responsible for
    /// destroying (or re-attaching) it. Detaching a root is a no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.unlink(id);
        Ok(())
    }

    /// Deep-copy a node and its subtree into a new root.
    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId> {
        let root = {
            let payload = shallow_copy(&self.node(id)?.payload);
            self.arena.alloc(payload)
        };
        let mut stack = vec![(id, root)];
        while let Some((src, dst)) = stack.pop() {
            let entries: Vec<(Option<String>, NodeId)> = match &self.node(src)?.payload {
                Payload::Array(items) => items.iter().map(|child| (None, *child)).collect(),
                Payload::Object(entries) => entries
                    .iter()
                    .map(|(key, child)| (Some(key.clone()), *child))
                    .collect(),
                _ => continue,
            };
            for (key, child) in entries {
                let payload = shallow_copy(&self.node(child)?.payload);
                let copy = self.arena.alloc(payload);
                self.node_mut(copy)?.parent = Some(dst);
                match (&mut self.node_mut(dst)?.payload, key) {
                    (Payload::Array(items), None) => items.push(copy),
                    (Payload::Object(entries), Some(key)) => entries.push((key, copy)),
                    _ => unreachable!("shallow copy preserves the container variant"),
                }
                stack.push((child, copy));
            }
        }
        Ok(root)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn type_of(&self, id: NodeId) -> Result<ValueType> {
        Ok(self.node(id)?.payload.value_type())
    }

    /// Number of children of an array or object.
    pub fn len(&self, id: NodeId) -> Result<usize> {
        match &self.node(id)?.payload {
            Payload::Array(items) => Ok(items.len()),
            Payload::Object(entries) => Ok(entries.len()),
            other => Err(TreeError::TypeMismatch {
                expected: "array or object",
                found: other.value_type().name(),
            }),
        }
    }

    /// The container owning `id`, or `None` for a root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn is_root(&self, id: NodeId) -> Result<bool> {
        Ok(self.parent(id)?.is_none())
    }

    /// Returns true while `id` refers to a node that has not been destroyed.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some()
    }

    /// Object keys in insertion order.
    pub fn keys(&self, id: NodeId) -> Result<Vec<&str>> {
        match &self.node(id)?.payload {
            Payload::Object(entries) => Ok(entries.iter().map(|(k, _)| k.as_str()).collect()),
            other => Err(TreeError::TypeMismatch {
                expected: "object",
                found: other.value_type().name(),
            }),
        }
    }

    /// Read a node itself: primitives are copied out, containers are
    /// returned as their own handle.
    pub fn value(&self, id: NodeId) -> Result<Lookup> {
        Ok(match &self.node(id)?.payload {
            Payload::Null => Lookup::Null,
            Payload::Bool(b) => Lookup::Bool(*b),
            Payload::Number(n) => Lookup::Number(*n),
            Payload::String(s) => Lookup::String(s.clone()),
            Payload::Array(_) | Payload::Object(_) => Lookup::Node(id),
        })
    }

    /// Number of nodes currently alive across all trees of this document.
    pub fn live_nodes(&self) -> usize {
        self.arena.live_count()
    }

    // ------------------------------------------------------------------
    // Crate-internal helpers
    // ------------------------------------------------------------------

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.arena.get(id).ok_or(TreeError::StaleHandle)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.arena.get_mut(id).ok_or(TreeError::StaleHandle)
    }

    /// Free `id` and its whole subtree without touching its parent.
    /// Returns the number of nodes freed.
    pub(crate) fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.arena.free(next) else {
                continue;
            };
            freed += 1;
            match node.payload {
                Payload::Array(items) => stack.extend(items),
                Payload::Object(entries) => stack.extend(entries.into_iter().map(|(_, id)| id)),
                _ => {}
            }
        }
        freed
    }

    /// Remove `id` from its parent's child list and clear its parent link.
    pub(crate) fn unlink(&mut self, id: NodeId) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        let Some(parent) = node.parent.take() else {
            return;
        };
        if let Some(owner) = self.arena.get_mut(parent) {
            match &mut owner.payload {
                Payload::Array(items) => items.retain(|child| *child != id),
                Payload::Object(entries) => entries.retain(|(_, child)| *child != id),
                _ => {}
            }
        }
    }

    /// Returns true if `candidate` is `id` itself or one of its ancestors.
    pub(crate) fn is_self_or_ancestor(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.arena.get(current).and_then(|node| node.parent);
        }
        false
    }
}

/// Copy a payload, leaving containers empty.
fn shallow_copy(payload: &Payload) -> Payload {
    match payload {
        Payload::Array(_) => Payload::Array(Vec::new()),
        Payload::Object(_) => Payload::Object(Vec::new()),
        primitive => primitive.clone(),
    }
}
