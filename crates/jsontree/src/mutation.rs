//! Indexed and keyed access to array and object nodes.
//!
//! - Arrays are addressed by [`Key::Index`], objects by [`Key::Name`];
//!   anything else is [`TreeError::InvalidKeyType`].
//! - Reads never fail for a missing child: they yield [`Lookup::Absent`].
//! - Writes replace the current occupant (destroying its subtree) or, for
//!   objects, append a new entry at the end of the insertion order. Array
//!   writes outside `0..len` fail with [`TreeError::IndexOutOfRange`]; use
//!   [`Document::push`] to grow an array.
//!
//! # Ownership transfer
//!
//! Passing an existing node as the value moves it: it is detached from its
//! previous owner (if any) and owned by the target container from then on.
//! The move happens before the old occupant is destroyed, so a node taken
//! from inside the subtree being replaced survives. A node cannot be attached
//! below itself ([`TreeError::CycleDetected`]). Every check runs before the
//! tree is touched, so a failed write leaves it unchanged.

use crate::arena::Payload;
use crate::document::Document;
use crate::error::{Result, TreeError};
use crate::types::{Input, Key, Lookup, NodeId};

/// Where a write lands inside its container.
enum Target<'k> {
    /// Replace the current occupant.
    Replace(NodeId),
    /// Append a new object entry under this key.
    Append(&'k str),
}

impl Document {
    /// Read the child of `container` at `key`.
    ///
    /// A negative or too-large array index yields [`Lookup::Absent`], as does
    /// a missing object key. Key lookup is exact byte equality.
    pub fn get<'k>(&self, container: NodeId, key: impl Into<Key<'k>>) -> Result<Lookup> {
        match self.child(container, key.into())? {
            Some(child) => self.value(child),
            None => Ok(Lookup::Absent),
        }
    }

    /// Write `value` into `container` at `key`.
    ///
    /// See the [module documentation](self) for replace, append and
    /// ownership-transfer rules.
    pub fn set<'k>(
        &mut self,
        container: NodeId,
        key: impl Into<Key<'k>>,
        value: impl Into<Input>,
    ) -> Result<()> {
        let key = key.into();
        let value = value.into();
        let target = self.resolve_target(container, key)?;

        if let Input::Node(node) = value {
            self.check_attachable(container, node)?;
            if matches!(target, Target::Replace(old) if old == node) {
                return Ok(());
            }
        }

        let child = self.materialize(value);
        self.node_mut(child)?.parent = Some(container);
        match target {
            Target::Replace(old) => {
                self.replace_child(container, old, child)?;
                let freed = self.free_subtree(old);
                tracing::trace!(container = %container, ?key, freed, "replaced child");
            }
            Target::Append(name) => {
                if let Payload::Object(entries) = &mut self.node_mut(container)?.payload {
                    entries.push((name.to_string(), child));
                }
                tracing::trace!(container = %container, ?key, "appended entry");
            }
        }
        Ok(())
    }

    /// Append `value` to the end of an array, transferring ownership like
    /// [`set`](Self::set).
    pub fn push(&mut self, array: NodeId, value: impl Into<Input>) -> Result<()> {
        let value = value.into();
        match &self.node(array)?.payload {
            Payload::Array(_) => {}
            other => {
                return Err(TreeError::TypeMismatch {
                    expected: "array",
                    found: other.value_type().name(),
                })
            }
        }
        if let Input::Node(node) = value {
            self.check_attachable(array, node)?;
        }

        let child = self.materialize(value);
        self.node_mut(child)?.parent = Some(array);
        if let Payload::Array(items) = &mut self.node_mut(array)?.payload {
            items.push(child);
        }
        tracing::trace!(array = %array, "pushed item");
        Ok(())
    }

    /// Remove and destroy the child of `container` at `key`.
    ///
    /// Returns `false` if there was no such child. Later array elements shift
    /// down by one.
    pub fn remove<'k>(&mut self, container: NodeId, key: impl Into<Key<'k>>) -> Result<bool> {
        let key = key.into();
        let Some(child) = self.child(container, key)? else {
            return Ok(false);
        };
        self.unlink(child);
        let freed = self.free_subtree(child);
        tracing::trace!(container = %container, ?key, freed, "removed child");
        Ok(true)
    }

    /// The handle of the child at `key`, or `None` if there is none.
    fn child(&self, container: NodeId, key: Key<'_>) -> Result<Option<NodeId>> {
        match (&self.node(container)?.payload, key) {
            (Payload::Array(items), Key::Index(index)) => Ok(usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .copied()),
            (Payload::Object(entries), Key::Name(name)) => Ok(entries
                .iter()
                .find(|(existing, _)| existing == name)
                .map(|(_, child)| *child)),
            (payload, key) => Err(key_error(payload, key)),
        }
    }

    fn resolve_target<'k>(&self, container: NodeId, key: Key<'k>) -> Result<Target<'k>> {
        match (&self.node(container)?.payload, key) {
            (Payload::Array(items), Key::Index(index)) => usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .map(|child| Target::Replace(*child))
                .ok_or(TreeError::IndexOutOfRange {
                    index,
                    len: items.len(),
                }),
            (Payload::Object(entries), Key::Name(name)) => Ok(entries
                .iter()
                .find(|(existing, _)| existing == name)
                .map_or(Target::Append(name), |(_, child)| Target::Replace(*child))),
            (payload, key) => Err(key_error(payload, key)),
        }
    }

    /// Reject stale handles and attachments that would create a cycle.
    fn check_attachable(&self, container: NodeId, node: NodeId) -> Result<()> {
        self.node(node)?;
        if self.is_self_or_ancestor(node, container) {
            return Err(TreeError::CycleDetected);
        }
        Ok(())
    }

    /// Turn an input into a detached node ready to be attached.
    fn materialize(&mut self, value: Input) -> NodeId {
        match value {
            Input::Null => self.create_null(),
            Input::Bool(b) => self.create_bool(b),
            Input::Number(n) => self.create_number(n),
            Input::String(s) => self.create_string(s),
            Input::Node(node) => {
                self.unlink(node);
                node
            }
        }
    }

    /// Put `new` in the place `old` occupies inside `container`.
    fn replace_child(&mut self, container: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        let slot = match &mut self.node_mut(container)?.payload {
            Payload::Array(items) => items.iter_mut().find(|child| **child == old),
            Payload::Object(entries) => entries
                .iter_mut()
                .find(|(_, child)| *child == old)
                .map(|(_, child)| child),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = new;
        }
        Ok(())
    }
}

fn key_error(payload: &Payload, key: Key<'_>) -> TreeError {
    match payload {
        Payload::Array(_) => TreeError::InvalidKeyType {
            container: "array",
            key: key.kind(),
        },
        Payload::Object(_) => TreeError::InvalidKeyType {
            container: "object",
            key: key.kind(),
        },
        other => TreeError::TypeMismatch {
            expected: "array or object",
            found: other.value_type().name(),
        },
    }
}
