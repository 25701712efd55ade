//! Quads and quad patterns.

use crate::node::Node;

/// A quad key in canonical (S, P, O, G) position order; `None` is the
/// wildcard sentinel and sorts below every node, so a pattern key is the
/// lower bound of its matching range in any index.
pub(crate) type Key = [Option<Node>; 4];

/// A statement: subject, predicate, object, and an optional graph node
/// (`None` is the default graph).
///
/// Only patterns have wildcards; a stored quad always has real S, P and O.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    s: Node,
    p: Node,
    o: Node,
    g: Option<Node>,
}

impl Quad {
    /// A new quad. All four nodes must come from the same world.
    pub fn new(s: Node, p: Node, o: Node, g: Option<Node>) -> Self {
        Quad { s, p, o, g }
    }

    /// The subject.
    pub fn s(&self) -> &Node {
        &self.s
    }

    /// The predicate.
    pub fn p(&self) -> &Node {
        &self.p
    }

    /// The object.
    pub fn o(&self) -> &Node {
        &self.o
    }

    /// The graph, or `None` for the default graph.
    pub fn g(&self) -> Option<&Node> {
        self.g.as_ref()
    }

    pub(crate) fn to_key(&self) -> Key {
        [
            Some(self.s.clone()),
            Some(self.p.clone()),
            Some(self.o.clone()),
            self.g.clone(),
        ]
    }
}

/// A quad pattern: every position is either a bound node or the wildcard
/// (`None`), which matches anything.
///
/// Note that `g: None` means "any graph", not "the default graph"; a find
/// cannot be restricted to the default graph alone.
#[derive(Clone, Debug, Default)]
pub struct Pattern {
    /// Subject, or wildcard.
    pub s: Option<Node>,
    /// Predicate, or wildcard.
    pub p: Option<Node>,
    /// Object, or wildcard.
    pub o: Option<Node>,
    /// Graph, or wildcard.
    pub g: Option<Node>,
}

impl Pattern {
    /// A new pattern.
    pub fn new(s: Option<Node>, p: Option<Node>, o: Option<Node>, g: Option<Node>) -> Self {
        Pattern { s, p, o, g }
    }

    /// The all-wildcard pattern.
    pub fn any() -> Self {
        Pattern::default()
    }

    /// True iff `quad` matches this pattern position-wise: every bound
    /// position must be the same node (handles are interned, so this is
    /// identity).
    pub fn matches(&self, quad: &Quad) -> bool {
        node_match(self.s.as_ref(), Some(quad.s()))
            && node_match(self.p.as_ref(), Some(quad.p()))
            && node_match(self.o.as_ref(), Some(quad.o()))
            && node_match(self.g.as_ref(), quad.g())
    }

    pub(crate) fn to_key(&self) -> Key {
        [
            self.s.clone(),
            self.p.clone(),
            self.o.clone(),
            self.g.clone(),
        ]
    }
}

impl From<&Quad> for Pattern {
    fn from(quad: &Quad) -> Self {
        let [s, p, o, g] = quad.to_key();
        Pattern { s, p, o, g }
    }
}

/// True iff a stored position matches a pattern position: the pattern is the
/// wildcard, or both are the same node. A stored default graph (`None`) does
/// not match a bound graph.
pub(crate) fn node_match(pattern: Option<&Node>, stored: Option<&Node>) -> bool {
    match pattern {
        None => true,
        Some(p) => stored == Some(p),
    }
}

/// Position-wise [`node_match`] over whole keys, pattern first.
pub(crate) fn key_match(pattern: &Key, stored: &Key) -> bool {
    pattern
        .iter()
        .zip(stored)
        .all(|(p, s)| node_match(p.as_ref(), s.as_ref()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::world::World;

    #[test]
    fn pattern_matching() {
        let w = World::new();
        let a = w.new_iri("tag:a");
        let b = w.new_iri("tag:b");
        let c = w.new_iri("tag:c");
        let g = w.new_iri("tag:g");
        let q = Quad::new(a.clone(), b.clone(), c.clone(), None);
        let qg = Quad::new(a.clone(), b.clone(), c.clone(), Some(g.clone()));

        assert!(Pattern::any().matches(&q));
        assert!(Pattern::new(Some(a.clone()), None, None, None).matches(&q));
        assert!(Pattern::new(None, None, Some(c.clone()), None).matches(&q));
        assert!(!Pattern::new(Some(c.clone()), None, None, None).matches(&q));

        // a wildcard graph matches both the default graph and named graphs
        assert!(Pattern::any().matches(&qg));
        // a bound graph matches the stored graph node only, not the default graph
        let with_g = Pattern::new(None, None, None, Some(g));
        assert!(with_g.matches(&qg));
        assert!(!with_g.matches(&q));
    }

    #[test]
    fn pattern_from_quad_is_fully_bound() {
        let w = World::new();
        let q = Quad::new(
            w.new_iri("tag:a"),
            w.new_iri("tag:b"),
            w.new_iri("tag:c"),
            None,
        );
        let p = Pattern::from(&q);
        assert!(p.s.is_some() && p.p.is_some() && p.o.is_some() && p.g.is_none());
        assert!(p.matches(&q));
    }
}
