//! An in-memory RDF quad store.
//!
//! The store keeps (subject, predicate, object, graph) statements under one
//! or more sorted indices, each a different lexicographic permutation of the
//! four positions, and answers wildcard patterns by picking the best
//! configured index for the bound positions. Terms are interned: a
//! [`World`] canonicalizes IRIs, blank nodes and literals into shared
//! handles, so equality everywhere is pointer identity.
//!
//! Three pieces matter:
//!
//! * [`World`] creates and owns [`Node`]s;
//! * [`Model`] holds the quad set under its configurable [`Order`] indices;
//! * [`Model::find`] streams the quads matching a [`Pattern`] lazily, in
//!   index order, collapsing graph duplicates when the walked index ignores
//!   graphs.
//!
//! Everything is single-threaded; a `World`, its `Model`s and their
//! iterators are neither `Send` nor `Sync`.
//!
//! # Example
//!
//! ```
//! use skein::{Model, Pattern, Quad, World};
//!
//! let world = World::new();
//! let mut model = Model::new(&world);
//!
//! let alice = world.new_iri("http://example.org/alice");
//! let knows = world.new_iri("http://example.org/knows");
//! let bob = world.new_iri("http://example.org/bob");
//! assert!(model.add(Quad::new(alice.clone(), knows.clone(), bob.clone(), None)));
//! assert!(!model.add(Quad::new(alice.clone(), knows, bob, None)));
//!
//! let found: Vec<Quad> = model
//!     .find(&Pattern::new(Some(alice), None, None, None))
//!     .collect();
//! assert_eq!(found.len(), 1);
//! ```

#![deny(missing_docs)]

pub mod index;
pub mod iter;
pub mod model;
pub mod node;
pub mod parser;
mod plan;
pub mod quad;
pub mod serializer;
pub mod world;

pub use index::Order;
pub use iter::Quads;
pub use model::Model;
pub use node::{Node, NodeFlags, NodeKind};
pub use quad::{Pattern, Quad};
pub use world::World;
