//! Nodes are the terms quads are made of: IRIs, blank nodes and literals.
//!
//! A [`Node`] is a cheap handle to data interned by a [`World`](crate::world::World):
//! two handles obtained from the same world compare equal if and only if they
//! denote the same term, so equality and hashing are pointer operations.
//! Ordering, on the other hand, is structural; it is the total order every
//! index comparator is built on.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Opaque per-literal bitset of serialization hints, carried from the reader.
///
/// The store never interprets these; writers may use them to skip escape
/// scans. Interning keeps the flags of the first occurrence of a literal.
pub type NodeFlags = u8;

/// The lexical form contains `\n` or `\r`.
pub const HAS_NEWLINE: NodeFlags = 1;
/// The lexical form contains `"`.
pub const HAS_QUOTE: NodeFlags = 1 << 1;

/// The three kinds of node, in comparison rank order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// An IRI referencing a resource.
    Iri,
    /// A blank node identifier.
    Blank,
    /// A literal: lexical form with optional datatype and language tag.
    Literal,
}

#[derive(Debug)]
pub(crate) struct LiteralValue {
    pub(crate) lexical: Box<str>,
    pub(crate) datatype: Option<Node>,
    pub(crate) lang: Option<Rc<str>>,
    pub(crate) flags: NodeFlags,
}

#[derive(Debug)]
pub(crate) enum NodeValue {
    Iri(Box<str>),
    Blank(Box<str>),
    Literal(LiteralValue),
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) value: NodeValue,
    /// Number of stored quads in which this node is the object.
    pub(crate) refs_as_obj: Cell<usize>,
}

/// A handle to an interned term.
///
/// Handles are created by [`World`](crate::world::World) methods only.
/// Cloning a handle is the reference-acquiring operation; dropping the last
/// handle (including the copies held by index keys and by literals for their
/// datatype) destroys the node and removes it from its interner table.
#[derive(Clone, Debug)]
pub struct Node(pub(crate) Rc<NodeData>);

impl Node {
    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self.0.value {
            NodeValue::Iri(_) => NodeKind::Iri,
            NodeValue::Blank(_) => NodeKind::Blank,
            NodeValue::Literal(_) => NodeKind::Literal,
        }
    }

    /// The lexical form: the IRI text, the blank node identifier, or the
    /// literal's lexical value.
    pub fn as_str(&self) -> &str {
        match &self.0.value {
            NodeValue::Iri(s) | NodeValue::Blank(s) => s,
            NodeValue::Literal(l) => &l.lexical,
        }
    }

    /// Byte length of the lexical form.
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// True iff the lexical form is empty.
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// The datatype of a literal, if any. Always an IRI node.
    pub fn datatype(&self) -> Option<&Node> {
        match &self.0.value {
            NodeValue::Literal(l) => l.datatype.as_ref(),
            _ => None,
        }
    }

    /// The language tag of a literal, if any.
    pub fn language(&self) -> Option<&str> {
        match &self.0.value {
            NodeValue::Literal(l) => l.lang.as_deref(),
            _ => None,
        }
    }

    /// The serialization-hint flags (0 for non-literals).
    pub fn flags(&self) -> NodeFlags {
        match &self.0.value {
            NodeValue::Literal(l) => l.flags,
            _ => 0,
        }
    }

    /// True iff this is an IRI node.
    pub fn is_iri(&self) -> bool {
        matches!(self.0.value, NodeValue::Iri(_))
    }

    /// True iff this is a blank node.
    pub fn is_blank(&self) -> bool {
        matches!(self.0.value, NodeValue::Blank(_))
    }

    /// True iff this is a literal node.
    pub fn is_literal(&self) -> bool {
        matches!(self.0.value, NodeValue::Literal(_))
    }

    /// True iff this is a blank node stored as the object of exactly one
    /// quad, i.e. one a pretty-printer may inline at its use site.
    pub fn is_inline_object(&self) -> bool {
        self.is_blank() && self.0.refs_as_obj.get() == 1
    }

    pub(crate) fn inc_obj_refs(&self) {
        self.0.refs_as_obj.set(self.0.refs_as_obj.get() + 1);
    }

    pub(crate) fn dec_obj_refs(&self) {
        let n = self.0.refs_as_obj.get();
        debug_assert!(n > 0);
        self.0.refs_as_obj.set(n - 1);
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    /// Total order: kind rank, then lexical bytes; literal ties are broken by
    /// datatype, then by language tag (absent first).
    ///
    /// Interning guarantees that structural equality implies handle identity,
    /// which keeps this ordering consistent with `PartialEq` for nodes of the
    /// same world.
    fn cmp(&self, other: &Self) -> Ordering {
        if Rc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal;
        }
        self.kind()
            .cmp(&other.kind())
            .then_with(|| match (&self.0.value, &other.0.value) {
                (NodeValue::Iri(a), NodeValue::Iri(b))
                | (NodeValue::Blank(a), NodeValue::Blank(b)) => a.cmp(b),
                (NodeValue::Literal(a), NodeValue::Literal(b)) => a
                    .lexical
                    .cmp(&b.lexical)
                    .then_with(|| a.datatype.cmp(&b.datatype))
                    .then_with(|| a.lang.cmp(&b.lang)),
                _ => unreachable!(),
            })
    }
}

impl fmt::Display for Node {
    /// N-Triples-like diagnostic form.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0.value {
            NodeValue::Iri(s) => write!(f, "<{s}>"),
            NodeValue::Blank(s) => write!(f, "_:{s}"),
            NodeValue::Literal(l) => {
                f.write_char('"')?;
                for c in l.lexical.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        _ => f.write_char(c)?,
                    }
                }
                f.write_char('"')?;
                if let Some(tag) = &l.lang {
                    write!(f, "@{tag}")?;
                } else if let Some(dt) = &l.datatype {
                    write!(f, "^^{dt}")?;
                }
                Ok(())
            }
        }
    }
}
