use std::fmt::Write as _;
use std::ops::Index;

use la_arena::{Arena, Idx, RawIdx};
use text_size::{TextRange, TextSize};

pub type NodeId = Idx<Node>;

/// A node of the utility-class tree.
///
/// `prev` and `next` thread every node of the tree into one flattened list in
/// source order, across group boundaries. `parent` points at the enclosing
/// group, variant or prefix identifier and is never an ownership edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: TextRange,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `(...)`, spanning from `(` to the matching `)`.
    Group,
    Variant(Variant),
    Identifier(Identifier),
}

/// Something like `hover:` or `after::`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub raw: String,
    pub value: String,
    /// The value without its last colon: `hover` or `after:`.
    pub name: String,
}

impl Variant {
    pub(crate) fn new(raw: String) -> Self {
        let name = raw.strip_suffix(':').unwrap_or(&raw).to_owned();
        Self { value: raw.clone(), raw, name }
    }
}

/// A utility name like `underline`, `-mx-5`, `bg-red-500!` or a group prefix
/// like `text` in `text(lg)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub raw: String,
    pub name: String,
    /// Closed by whitespace, `)` or the end of input.
    pub terminator: bool,
    /// Leading `-`.
    pub negated: bool,
    /// Leading or trailing `!`.
    pub important: bool,
}

impl Identifier {
    pub(crate) fn new(raw: String, terminator: bool) -> Self {
        let mut name = raw.as_str();
        let mut important = false;

        if let Some(rest) = name.strip_prefix('!') {
            name = rest;
            important = true;
        } else if let Some(rest) = name.strip_suffix('!') {
            name = rest;
            important = true;
        }

        let negated = match name.strip_prefix('-') {
            Some(rest) => {
                name = rest;
                true
            }
            None => false,
        };

        Self { name: name.to_owned(), raw, terminator, negated, important }
    }
}

impl Node {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    pub fn is_variant(&self) -> bool {
        matches!(self.kind, NodeKind::Variant(_))
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match &self.kind {
            NodeKind::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }
}

/// The tree of one utility-class string. The root is a synthetic group
/// spanning the whole text.
#[derive(Debug)]
pub struct Tree {
    pub(crate) nodes: Arena<Node>,
}

impl Tree {
    pub(crate) fn new(len: TextSize) -> Self {
        let mut nodes = Arena::default();
        nodes.alloc(Node {
            kind: NodeKind::Group,
            range: TextRange::up_to(len),
            prev: None,
            next: None,
            parent: None,
        });
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId::from_raw(RawIdx::from(0u32))
    }

    /// All nodes in source order, starting with the root.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(self.root()), |&id| self[id].next)
    }

    pub fn last(&self) -> NodeId {
        self.iter().last().unwrap_or_else(|| self.root())
    }

    /// `id` followed by its parent chain up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&id| self[id].parent)
    }

    /// Identifiers that were closed in the source and therefore form rules.
    pub fn terminal_identifiers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|&id| self[id].as_identifier().is_some_and(|it| it.terminator))
    }

    /// Appends an empty, unterminated identifier right after `after`, nested
    /// inside it. Used to give a completion cursor that ended on a group or
    /// variant something to materialize.
    pub fn append_placeholder(&mut self, after: NodeId) -> NodeId {
        let end = self[after].range.end();
        let id = self.nodes.alloc(Node {
            kind: NodeKind::Identifier(Identifier::new(String::new(), false)),
            range: TextRange::empty(end),
            prev: Some(after),
            next: None,
            parent: Some(after),
        });
        self.nodes[after].next = Some(id);
        id
    }

    pub fn debug_dump(&self) -> String {
        let mut buf = String::new();

        for id in self.iter() {
            let node = &self[id];
            let depth = self.ancestors(id).count() - 1;
            let indent = "  ".repeat(depth);

            match &node.kind {
                NodeKind::Group => {
                    _ = writeln!(buf, "{indent}GROUP@{:?}", node.range);
                }
                NodeKind::Variant(variant) => {
                    _ = writeln!(buf, "{indent}VARIANT@{:?} {:?}", node.range, variant.raw);
                }
                NodeKind::Identifier(identifier) => {
                    _ = write!(buf, "{indent}IDENTIFIER@{:?} {:?}", node.range, identifier.raw);
                    for (set, flag) in [
                        (identifier.important, "important"),
                        (identifier.negated, "negated"),
                        (identifier.terminator, "terminator"),
                    ] {
                        if set {
                            _ = write!(buf, " {flag}");
                        }
                    }
                    buf.push('\n');
                }
            }
        }

        buf
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index]
    }
}
