//! Lazy iteration over matching quads.

use std::collections::btree_set;

use crate::index::QuadIndex;
use crate::node::Node;
use crate::plan::SearchMode;
use crate::quad::{key_match, node_match, Key, Pattern, Quad};

/// Iterator over the quads matching a pattern, in the planned index's order.
///
/// Walking a graph-less order with an unbound graph position collapses
/// duplicates: a triple asserted in several graphs is yielded once, carrying
/// the graph of its first-visited (least) element, i.e. the default graph if
/// present, otherwise the smallest graph node.
///
/// The iterator borrows its model, so the borrow checker rules out mutation
/// while it is alive.
#[derive(Debug)]
pub struct Quads<'a> {
    range: btree_set::Range<'a, Key>,
    /// The pattern, permuted into the index's order.
    pat: Key,
    /// Canonical position of each key slot.
    perm: &'static [usize; 4],
    mode: SearchMode,
    /// Bound prefix length for Range and FilterRange.
    n_prefix: usize,
    /// Collapse graph duplicates (graph-less order, unbound graph).
    skip_graphs: bool,
    /// Last visited key, for collapsing.
    prev: Option<&'a Key>,
    done: bool,
}

impl<'a> Quads<'a> {
    pub(crate) fn new(
        index: &'a QuadIndex,
        pattern: &Pattern,
        mode: SearchMode,
        n_prefix: usize,
    ) -> Self {
        let order = index.order();
        let key = pattern.to_key();
        Quads {
            range: index.range_from(&key),
            pat: index.permute(&key),
            perm: order.permutation(),
            mode,
            n_prefix,
            skip_graphs: !order.is_graph_order() && pattern.g.is_none(),
            prev: None,
            done: false,
        }
    }

    fn prefix_matches(&self, key: &Key) -> bool {
        self.pat
            .iter()
            .zip(key)
            .take(self.n_prefix)
            .all(|(p, k)| node_match(p.as_ref(), k.as_ref()))
    }

    /// Rewrite an index key back into canonical position order.
    fn emit(&self, key: &Key) -> Quad {
        let mut out: [Option<Node>; 4] = [None, None, None, None];
        for (i, slot) in key.iter().enumerate() {
            out[self.perm[i]] = slot.clone();
        }
        let [s, p, o, g] = out;
        Quad::new(s.unwrap(), p.unwrap(), o.unwrap(), g)
    }
}

impl Iterator for Quads<'_> {
    type Item = Quad;

    fn next(&mut self) -> Option<Quad> {
        if self.done {
            return None;
        }
        while let Some(key) = self.range.next() {
            // Graph-less orders keep G in the last key slot, so keys that
            // differ only by graph are adjacent; skip past the duplicates.
            if self.skip_graphs {
                if let Some(prev) = self.prev {
                    if prev[..3] == key[..3] {
                        continue;
                    }
                }
            }
            self.prev = Some(key);
            match self.mode {
                SearchMode::All => return Some(self.emit(key)),
                SearchMode::Single => {
                    self.done = true;
                    return key_match(&self.pat, key).then(|| self.emit(key));
                }
                SearchMode::Range => {
                    if !self.prefix_matches(key) {
                        break;
                    }
                    return Some(self.emit(key));
                }
                SearchMode::FilterRange => {
                    if !self.prefix_matches(key) {
                        break;
                    }
                    if key_match(&self.pat, key) {
                        return Some(self.emit(key));
                    }
                }
                SearchMode::FilterAll => {
                    if key_match(&self.pat, key) {
                        return Some(self.emit(key));
                    }
                }
            }
        }
        self.done = true;
        None
    }
}
