//! Handle, key and value types shared by every part of the tree API.

use std::fmt;

/// Handle to a node inside a [`Document`](crate::Document).
///
/// Handles are cheap to copy. A handle carries the generation of the slot it
/// was issued for, so once the node is destroyed every copy of the handle
/// becomes stale and is rejected instead of aliasing whatever reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// The variant tag of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueType {
    /// Returns true for arrays and objects.
    pub fn is_container(self) -> bool {
        matches!(self, ValueType::Array | ValueType::Object)
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Address of a child: an integer index for arrays, a string key for objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    Index(i64),
    Name(&'a str),
}

impl Key<'_> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Key::Index(_) => "integer index",
            Key::Name(_) => "string key",
        }
    }
}

impl From<i64> for Key<'_> {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key<'_> {
    fn from(index: i32) -> Self {
        Key::Index(i64::from(index))
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Key::Name(name.as_str())
    }
}

/// A value written into a container by [`Document::set`](crate::Document::set)
/// or [`Document::push`](crate::Document::push).
///
/// Primitives are turned into fresh nodes; `Node` transfers an existing node
/// into the container.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Node(NodeId),
}

impl From<()> for Input {
    fn from(_: ()) -> Self {
        Input::Null
    }
}

impl From<bool> for Input {
    fn from(b: bool) -> Self {
        Input::Bool(b)
    }
}

impl From<f64> for Input {
    fn from(n: f64) -> Self {
        Input::Number(n)
    }
}

impl From<i32> for Input {
    fn from(n: i32) -> Self {
        Input::Number(f64::from(n))
    }
}

impl From<i64> for Input {
    fn from(n: i64) -> Self {
        Input::Number(n as f64)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::String(s.to_string())
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::String(s)
    }
}

impl From<NodeId> for Input {
    fn from(id: NodeId) -> Self {
        Input::Node(id)
    }
}

/// Result of reading a child with [`Document::get`](crate::Document::get).
///
/// Primitives are copied out. Containers come back as a handle that aliases
/// the live subtree, so writes through it change the original tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    /// No child at that index or key.
    Absent,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Node(NodeId),
}

impl Lookup {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Lookup::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Lookup::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Lookup::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Lookup::Node(id) => Some(*id),
            _ => None,
        }
    }
}
