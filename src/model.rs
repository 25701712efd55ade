//! The model: a set of quads maintained under one or more indices.

use std::array;

use crate::index::{Order, QuadIndex, NUM_ORDERS};
use crate::iter::Quads;
use crate::plan::{best_index, SearchMode};
use crate::quad::{Pattern, Quad};
use crate::world::World;

/// An ordered set of quads.
///
/// A model maintains the same quad set under every configured index
/// [`Order`] and keeps the indices coherent across every mutation. Which
/// orders to configure is a load/query trade-off: more indices cost
/// insertion time and memory, fewer indices push finds into filtered scans.
///
/// All nodes stored in a model must come from the world it was built
/// against.
#[derive(Debug)]
pub struct Model {
    world: World,
    indices: [Option<QuadIndex>; NUM_ORDERS],
    n_quads: usize,
}

impl Model {
    /// A model with the stock index pair (SPO and OPS) and no graph indexing.
    pub fn new(world: &World) -> Self {
        Self::with_indices(world, [Order::Spo, Order::Ops], false)
    }

    /// A model with the given index orders.
    ///
    /// When `graphs` is true, every graph-less order in `orders` also gets
    /// its graph-prefixed counterpart. The default order (SPO) is always
    /// created.
    pub fn with_indices<I>(world: &World, orders: I, graphs: bool) -> Self
    where
        I: IntoIterator<Item = Order>,
    {
        let mut indices: [Option<QuadIndex>; NUM_ORDERS] = array::from_fn(|_| None);
        for order in orders {
            indices[order as usize].get_or_insert_with(|| QuadIndex::new(order));
            if graphs && !order.is_graph_order() {
                let g = order.with_graph();
                indices[g as usize].get_or_insert_with(|| QuadIndex::new(g));
            }
        }
        indices[Order::DEFAULT as usize].get_or_insert_with(|| QuadIndex::new(Order::DEFAULT));
        Model {
            world: world.clone(),
            indices,
            n_quads: 0,
        }
    }

    /// The world this model's nodes live in.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of stored quads. Constant time.
    pub fn num_quads(&self) -> usize {
        self.n_quads
    }

    /// True iff no quad is stored.
    pub fn is_empty(&self) -> bool {
        self.n_quads == 0
    }

    /// The configured index orders.
    pub fn orders(&self) -> impl Iterator<Item = Order> + '_ {
        self.indices.iter().flatten().map(|index| index.order())
    }

    /// True iff `quad` is stored.
    pub fn contains(&self, quad: &Quad) -> bool {
        self.default_index().contains(&quad.to_key())
    }

    /// Insert a quad into every configured index.
    ///
    /// Returns false, leaving the model untouched, if the quad was already
    /// present. Duplicates are detected against the default index before any
    /// index is written, so the indices never disagree.
    pub fn add(&mut self, quad: Quad) -> bool {
        let key = quad.to_key();
        if self.default_index().contains(&key) {
            return false;
        }
        for index in self.indices.iter_mut().flatten() {
            let inserted = index.insert(&key);
            debug_assert!(inserted);
        }
        quad.o().inc_obj_refs();
        self.n_quads += 1;
        debug_assert_eq!(self.n_quads, self.default_index().len());
        true
    }

    /// Remove a quad from every configured index.
    ///
    /// Removing an absent quad is a no-op returning false.
    pub fn remove(&mut self, quad: &Quad) -> bool {
        let key = quad.to_key();
        if !self.default_index().contains(&key) {
            return false;
        }
        for index in self.indices.iter_mut().flatten() {
            let removed = index.remove(&key);
            debug_assert!(removed);
        }
        quad.o().dec_obj_refs();
        self.n_quads -= 1;
        debug_assert_eq!(self.n_quads, self.default_index().len());
        true
    }

    /// Iterate every stored quad in default (SPO) order.
    ///
    /// This is graph-collapsing iteration: a triple asserted in several
    /// graphs is yielded once (see [`Quads`]).
    pub fn iter(&self) -> Quads<'_> {
        self.find(&Pattern::any())
    }

    /// Full iteration in the given order, if it is configured.
    ///
    /// Graph-prefixed orders yield every quad; graph-less orders collapse
    /// graph duplicates as [`iter`](Model::iter) does.
    pub fn iter_in(&self, order: Order) -> Option<Quads<'_>> {
        let index = self.indices[order as usize].as_ref()?;
        Some(Quads::new(index, &Pattern::any(), SearchMode::All, 0))
    }

    /// Stream the quads matching `pattern`, in the planned index's order.
    pub fn find(&self, pattern: &Pattern) -> Quads<'_> {
        let (order, mode, n_prefix) =
            best_index(|order| self.indices[order as usize].is_some(), pattern);
        let index = self.indices[order as usize].as_ref().unwrap();
        Quads::new(index, pattern, mode, n_prefix)
    }

    fn default_index(&self) -> &QuadIndex {
        // with_indices unconditionally creates the default order
        self.indices[Order::DEFAULT as usize].as_ref().unwrap()
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        // Release the per-quad object counts; the node handles themselves go
        // with the index storage.
        let default = self.default_index();
        let obj_slot = Order::DEFAULT
            .permutation()
            .iter()
            .position(|&p| p == 2)
            .unwrap();
        for key in default.range_full() {
            if let Some(o) = &key[obj_slot] {
                o.dec_obj_refs();
            }
        }
    }
}
