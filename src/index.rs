//! Index orderings and the sorted quad index.
//!
//! An [`Order`] names one of the twelve lexicographic key permutations: the
//! six permutations of (S, P, O), and the six graph-prefixed counterparts
//! with G as the most significant position. Graph-less orders still keep G
//! as the least significant tie-break, so a triple asserted in two graphs
//! remains two distinct keys; collapsing those duplicates is the iterator's
//! business, not the index's.

use std::collections::btree_set::{self, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::quad::Key;

/// Number of orderings ([`Order`] variants).
pub(crate) const NUM_ORDERS: usize = 12;

/// One of the twelve quad orderings, most significant position first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Subject, Predicate, Object.
    Spo,
    /// Subject, Object, Predicate.
    Sop,
    /// Object, Predicate, Subject.
    Ops,
    /// Object, Subject, Predicate.
    Osp,
    /// Predicate, Subject, Object.
    Pso,
    /// Predicate, Object, Subject.
    Pos,
    /// Graph, Subject, Predicate, Object.
    Gspo,
    /// Graph, Subject, Object, Predicate.
    Gsop,
    /// Graph, Object, Predicate, Subject.
    Gops,
    /// Graph, Object, Subject, Predicate.
    Gosp,
    /// Graph, Predicate, Subject, Object.
    Gpso,
    /// Graph, Predicate, Object, Subject.
    Gpos,
}

/// Canonical position held by each key slot, most significant first
/// (canonical positions: 0 = S, 1 = P, 2 = O, 3 = G).
static PERMUTATIONS: [[usize; 4]; NUM_ORDERS] = [
    [0, 1, 2, 3], // spo
    [0, 2, 1, 3], // sop
    [2, 1, 0, 3], // ops
    [2, 0, 1, 3], // osp
    [1, 0, 2, 3], // pso
    [1, 2, 0, 3], // pos
    [3, 0, 1, 2], // gspo
    [3, 0, 2, 1], // gsop
    [3, 2, 1, 0], // gops
    [3, 2, 0, 1], // gosp
    [3, 1, 0, 2], // gpso
    [3, 1, 2, 0], // gpos
];

static NAMES: [&str; NUM_ORDERS] = [
    "spo", "sop", "ops", "osp", "pso", "pos", "gspo", "gsop", "gops", "gosp", "gpso", "gpos",
];

impl Order {
    /// All twelve orders, graph-less first.
    pub const ALL: [Order; NUM_ORDERS] = [
        Order::Spo,
        Order::Sop,
        Order::Ops,
        Order::Osp,
        Order::Pso,
        Order::Pos,
        Order::Gspo,
        Order::Gsop,
        Order::Gops,
        Order::Gosp,
        Order::Gpso,
        Order::Gpos,
    ];

    /// The default order, configured in every model.
    pub const DEFAULT: Order = Order::Spo;

    /// The default graph-prefixed order.
    pub const DEFAULT_GRAPH: Order = Order::Gspo;

    /// True iff G is the most significant position of this order.
    pub fn is_graph_order(self) -> bool {
        self as usize >= NUM_ORDERS / 2
    }

    /// The graph-prefixed counterpart of this order (self if already one).
    pub fn with_graph(self) -> Order {
        if self.is_graph_order() {
            self
        } else {
            Order::ALL[self as usize + NUM_ORDERS / 2]
        }
    }

    pub(crate) fn permutation(self) -> &'static [usize; 4] {
        &PERMUTATIONS[self as usize]
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(NAMES[*self as usize])
    }
}

/// Error returned when an [`Order`] name does not parse.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown index order `{0}` (expected spo, sop, ops, osp, pso, pos, or a g-prefixed form)")]
pub struct ParseOrderError(String);

impl FromStr for Order {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .map(|i| Order::ALL[i])
            .ok_or_else(|| ParseOrderError(s.to_string()))
    }
}

/// A sorted set of quads under one ordering.
///
/// Keys are stored permuted into the order and owned by the index (handle
/// clones). The derived array ordering over `Option<Node>` keys (wildcard
/// first, then the node total order) is the wildcard-aware comparator, so
/// a permuted pattern is the lower bound of its matching range.
#[derive(Debug)]
pub(crate) struct QuadIndex {
    order: Order,
    keys: BTreeSet<Key>,
}

impl QuadIndex {
    pub(crate) fn new(order: Order) -> Self {
        QuadIndex {
            order,
            keys: BTreeSet::new(),
        }
    }

    pub(crate) fn order(&self) -> Order {
        self.order
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// Rewrite a canonical-order key into this index's order.
    pub(crate) fn permute(&self, key: &Key) -> Key {
        let perm = self.order.permutation();
        [
            key[perm[0]].clone(),
            key[perm[1]].clone(),
            key[perm[2]].clone(),
            key[perm[3]].clone(),
        ]
    }

    pub(crate) fn insert(&mut self, key: &Key) -> bool {
        self.keys.insert(self.permute(key))
    }

    pub(crate) fn remove(&mut self, key: &Key) -> bool {
        self.keys.remove(&self.permute(key))
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.keys.contains(&self.permute(key))
    }

    /// Cursor at the leftmost key >= `pattern` (canonical order, wildcards
    /// as minima).
    pub(crate) fn range_from(&self, pattern: &Key) -> btree_set::Range<'_, Key> {
        self.keys.range(self.permute(pattern)..)
    }

    pub(crate) fn range_full(&self) -> btree_set::Range<'_, Key> {
        self.keys.range::<Key, _>(..)
    }
}
