//! Node chain arena
//!
//! The intermediate structure shared by every conversion direction: a
//! forward-linked chain of nodes, each of which may own a small tree of
//! children representing nested inline styling applied to the same text
//! run. Nodes live in a [`NodeArena`] and address each other by index,
//! so `prev` links are plain back-references with no ownership cycle.

use std::ops::{Index, IndexMut};

/// Index of a node inside its [`NodeArena`].
pub type NodeId = usize;

/// The construct a node represents. `None` on the [`Node`] itself means
/// plain text (or the sentinel head).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Bold,
    Italic,
    Strike,
    Link,
    Header,
    Blockquote,
    Code,
    CodeBlock,
    List,
    Mention,
}

impl NodeKind {
    /// Block kinds carry their attribute on a trailing `"\n"` marker
    /// rather than on the content run itself.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Header | NodeKind::Blockquote | NodeKind::CodeBlock | NodeKind::List
        )
    }
}

/// List flavor for [`NodeKind::List`] nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Bullet => "bullet",
            ListKind::Ordered => "ordered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bullet" => Some(ListKind::Bullet),
            "ordered" => Some(ListKind::Ordered),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            ListKind::Bullet => ListKind::Ordered,
            ListKind::Ordered => ListKind::Bullet,
        }
    }
}

/// Resolved mention data carried by a [`NodeKind::Mention`] node.
///
/// Field names follow the wire format of the delta embed payload
/// (`index`, `denotationChar`, `value`, `id`) plus the descriptor type
/// the payload is keyed under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MentionOptions {
    pub index: String,
    pub denotation_char: String,
    pub value: String,
    pub id: String,
    pub mention_type: String,
}

/// Kind-specific payload of a node. Only the fields relevant to the
/// node's kind are set; the rest stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeOptions {
    pub link: Option<String>,
    pub header: Option<i64>,
    pub list: Option<ListKind>,
    pub indent: usize,
    pub mention: Option<MentionOptions>,
}

/// One element of the chain.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub kind: Option<NodeKind>,
    pub text: String,
    pub options: NodeOptions,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    /// A plain text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A node with a kind, text, and options.
    pub fn new(kind: NodeKind, text: impl Into<String>, options: NodeOptions) -> Self {
        Self {
            kind: Some(kind),
            text: text.into(),
            options,
            ..Default::default()
        }
    }
}

/// Growable node storage. The arena always starts with a sentinel head
/// node (`kind = None`, empty text) at id 0; chains are built by
/// appending after the current tail.
#[derive(Debug)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Id of the sentinel head.
    pub fn head(&self) -> NodeId {
        0
    }

    /// True for the sentinel head (empty text, no predecessor).
    pub fn is_head(&self, id: NodeId) -> bool {
        self.nodes[id].text.is_empty() && self.nodes[id].prev.is_none()
    }

    /// Store a detached node and return its id.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Link `id` after `tail` and return `id` as the new tail.
    pub fn append(&mut self, tail: NodeId, id: NodeId) -> NodeId {
        self.nodes[tail].next = Some(id);
        self.nodes[id].prev = Some(tail);
        id
    }

    /// Splice `id` into the chain directly after `at`.
    pub fn insert_after(&mut self, at: NodeId, id: NodeId) {
        let old_next = self.nodes[at].next;
        self.nodes[id].prev = Some(at);
        self.nodes[id].next = old_next;
        if let Some(n) = old_next {
            self.nodes[n].prev = Some(id);
        }
        self.nodes[at].next = Some(id);
    }

    /// Forward iterator over the chain starting after the sentinel.
    pub fn iter_chain(&self) -> ChainIter<'_> {
        ChainIter {
            arena: self,
            current: self.nodes[self.head()].next,
        }
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}

/// Iterator produced by [`NodeArena::iter_chain`].
pub struct ChainIter<'a> {
    arena: &'a NodeArena,
    current: Option<NodeId>,
}

impl Iterator for ChainIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.arena[id].next;
        Some(id)
    }
}
