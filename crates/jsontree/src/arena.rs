//! Generational slot arena holding every node of a document.
//!
//! Nodes refer to each other by [`NodeId`] rather than by pointer. Each slot
//! carries a generation counter that is bumped when the slot is freed, so a
//! handle issued before the free no longer matches and lookups through it
//! return `None`.
//!
//! # Invariants
//!
//! - Slots in the free list contain `None`
//! - A live slot's generation equals the generation of every valid handle to it
//! - `live` equals the number of slots holding `Some(Node)`

use crate::types::{NodeId, ValueType};

/// Node contents. Children are owned through their handles.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<NodeId>),
    /// Key-value pairs in insertion order, keys unique.
    Object(Vec<(String, NodeId)>),
}

impl Payload {
    pub(crate) fn value_type(&self) -> ValueType {
        match self {
            Payload::Null => ValueType::Null,
            Payload::Bool(_) => ValueType::Bool,
            Payload::Number(_) => ValueType::Number,
            Payload::String(_) => ValueType::String,
            Payload::Array(_) => ValueType::Array,
            Payload::Object(_) => ValueType::Object,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) payload: Payload,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a new root node, reusing a free slot when one is available.
    pub(crate) fn alloc(&mut self, payload: Payload) -> NodeId {
        let node = Node {
            parent: None,
            payload,
        };
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.node.is_none(), "free slot was not empty");
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).expect("arena exceeded maximum capacity");
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Remove a single node from its slot. Children are not touched.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        self.live -= 1;
        // A slot whose generation would wrap is retired rather than recycled.
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free_list.push(id.index);
        }
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.live
    }
}
