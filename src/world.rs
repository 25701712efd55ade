//! The world interns nodes and owns their backing data.
//!
//! Every [`Node`] is created through a [`World`], which guarantees that two
//! semantically equal terms share one handle (see [`crate::node`]). A world
//! is itself a cheap handle; models keep a clone, so a world always outlives
//! the models built against it. Worlds, like everything in this crate, are
//! single-threaded.

use std::cell::{Cell, RefCell};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use weak_table::WeakHashSet;

use crate::node::{LiteralValue, Node, NodeData, NodeFlags, NodeKind, NodeValue};

/// Key of the literal table: lexical form plus datatype and language tag
/// *identity* (both are interned, so identity is equality). The hash covers
/// the lexical form and the language tag only.
struct LiteralKey {
    lexical: Box<str>,
    datatype: Option<Node>,
    lang: Option<Rc<str>>,
}

impl PartialEq for LiteralKey {
    fn eq(&self, other: &Self) -> bool {
        self.lexical == other.lexical
            && self.datatype == other.datatype
            && match (&self.lang, &other.lang) {
                (None, None) => true,
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl Eq for LiteralKey {}

impl Hash for LiteralKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lexical.hash(state);
        if let Some(lang) = &self.lang {
            lang.hash(state);
        }
    }
}

struct WorldInner {
    /// IRI lexical form => node.
    iris: RefCell<HashMap<Box<str>, Weak<NodeData>>>,
    /// Blank node identifier => node.
    blanks: RefCell<HashMap<Box<str>, Weak<NodeData>>>,
    /// Interned language tags, shared by all literals carrying them.
    langs: RefCell<WeakHashSet<Weak<str>>>,
    literals: RefCell<HashMap<LiteralKey, Weak<NodeData>>>,
}

/// The interner: sole creator of [`Node`]s.
///
/// Tables hold weak references; a node is destroyed when its last handle is
/// dropped, and its table entry is purged lazily. Cloning a `World` clones
/// the handle, not the tables.
#[derive(Clone)]
pub struct World(Rc<WorldInner>);

impl World {
    /// An empty world.
    pub fn new() -> Self {
        World(Rc::new(WorldInner {
            iris: RefCell::new(HashMap::new()),
            blanks: RefCell::new(HashMap::new()),
            langs: RefCell::new(WeakHashSet::new()),
            literals: RefCell::new(HashMap::new()),
        }))
    }

    /// The IRI node for `iri`, interned.
    pub fn new_iri(&self, iri: &str) -> Node {
        self.intern_name(NodeKind::Iri, iri)
    }

    /// The blank node for identifier `id`, interned.
    ///
    /// Blank nodes and IRIs are interned separately: a blank node never
    /// compares equal to an IRI, even with the same lexical form.
    pub fn new_blank(&self, id: &str) -> Node {
        self.intern_name(NodeKind::Blank, id)
    }

    /// The literal node for `lexical` with optional `datatype` (an IRI node
    /// of this world) and optional language tag, interned.
    pub fn new_literal(&self, datatype: Option<&Node>, lexical: &str, lang: Option<&str>) -> Node {
        self.new_literal_with_flags(datatype, lexical, lang, 0)
    }

    /// Like [`new_literal`](World::new_literal), also attaching the reader's
    /// serialization-hint flags. Interning ignores the flags: if the literal
    /// already exists, the existing node (with its original flags) is
    /// returned.
    pub fn new_literal_with_flags(
        &self,
        datatype: Option<&Node>,
        lexical: &str,
        lang: Option<&str>,
        flags: NodeFlags,
    ) -> Node {
        debug_assert!(datatype.map_or(true, Node::is_iri));
        let lang = lang.map(|tag| self.intern_lang(tag));
        let key = LiteralKey {
            lexical: lexical.into(),
            datatype: datatype.cloned(),
            lang,
        };
        let mut literals = self.0.literals.borrow_mut();
        match literals.entry(key) {
            Entry::Occupied(mut e) => {
                if let Some(data) = e.get().upgrade() {
                    return Node(data);
                }
                let node = literal_node(e.key(), flags);
                e.insert(Rc::downgrade(&node.0));
                node
            }
            Entry::Vacant(e) => {
                let node = literal_node(e.key(), flags);
                e.insert(Rc::downgrade(&node.0));
                node
            }
        }
    }

    /// Number of live interned nodes.
    ///
    /// Purges dead table entries, so the count reflects exactly the nodes
    /// still reachable from some handle.
    pub fn num_nodes(&self) -> usize {
        // Literals first: a dead literal's key still pins its datatype, so
        // the datatype entry only reads as dead once the key is gone.
        let mut literals = self.0.literals.borrow_mut();
        literals.retain(|_, node| node.strong_count() > 0);
        let mut iris = self.0.iris.borrow_mut();
        iris.retain(|_, node| node.strong_count() > 0);
        let mut blanks = self.0.blanks.borrow_mut();
        blanks.retain(|_, node| node.strong_count() > 0);
        literals.len() + iris.len() + blanks.len()
    }

    /// Purge dead entries and release excess table capacity.
    pub fn shrink_to_fit(&self) {
        self.num_nodes();
        self.0.iris.borrow_mut().shrink_to_fit();
        self.0.blanks.borrow_mut().shrink_to_fit();
        self.0.literals.borrow_mut().shrink_to_fit();
        self.0.langs.borrow_mut().shrink_to_fit();
    }

    fn intern_name(&self, kind: NodeKind, name: &str) -> Node {
        let table = match kind {
            NodeKind::Iri => &self.0.iris,
            NodeKind::Blank => &self.0.blanks,
            NodeKind::Literal => unreachable!(),
        };
        let mut table = table.borrow_mut();
        if let Some(data) = table.get(name).and_then(Weak::upgrade) {
            return Node(data);
        }
        let value = match kind {
            NodeKind::Iri => NodeValue::Iri(name.into()),
            _ => NodeValue::Blank(name.into()),
        };
        let data = Rc::new(NodeData {
            value,
            refs_as_obj: Cell::new(0),
        });
        table.insert(name.into(), Rc::downgrade(&data));
        Node(data)
    }

    fn intern_lang(&self, tag: &str) -> Rc<str> {
        let mut langs = self.0.langs.borrow_mut();
        if let Some(tag) = langs.get(tag) {
            tag
        } else {
            let tag: Rc<str> = Rc::from(tag);
            langs.insert(Rc::clone(&tag));
            tag
        }
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("World").finish_non_exhaustive()
    }
}

fn literal_node(key: &LiteralKey, flags: NodeFlags) -> Node {
    Node(Rc::new(NodeData {
        value: NodeValue::Literal(LiteralValue {
            lexical: key.lexical.clone(),
            datatype: key.datatype.clone(),
            lang: key.lang.clone(),
            flags,
        }),
        refs_as_obj: Cell::new(0),
    }))
}
