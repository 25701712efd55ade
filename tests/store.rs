//! End-to-end exercises of the store: world, model, planner, iteration and
//! the reader/writer adapters together.

use std::collections::HashSet;

use skein::serializer::{NqSerializer, NtSerializer};
use skein::{parser, Model, Node, Order, Pattern, Quad, World};

fn iri(w: &World, name: &str) -> Node {
    w.new_iri(&format!("tag:{name}"))
}

#[test]
fn subject_lookup_streams_in_spo_order() {
    let w = World::new();
    let mut m = Model::new(&w);
    let (a, b, c, d, e) = (
        iri(&w, "a"),
        iri(&w, "b"),
        iri(&w, "c"),
        iri(&w, "d"),
        iri(&w, "e"),
    );
    assert!(m.add(Quad::new(a.clone(), b.clone(), c.clone(), None)));
    assert!(m.add(Quad::new(a.clone(), b.clone(), d.clone(), None)));
    assert!(m.add(Quad::new(e.clone(), b.clone(), c.clone(), None)));
    assert_eq!(m.num_quads(), 3);

    let found: Vec<Quad> = m
        .find(&Pattern::new(Some(a.clone()), None, None, None))
        .collect();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].o(), &c);
    assert_eq!(found[1].o(), &d);
    for q in &found {
        assert_eq!(q.s(), &a);
    }
}

#[test]
fn duplicate_literal_quad_is_rejected() {
    let w = World::new();
    let mut m = Model::new(&w);
    let t = iri(&w, "T");
    let q = Quad::new(
        iri(&w, "a"),
        iri(&w, "b"),
        w.new_literal(Some(&t), "x", None),
        None,
    );
    assert!(m.add(q.clone()));
    assert!(!m.add(Quad::new(
        q.s().clone(),
        q.p().clone(),
        w.new_literal(Some(&t), "x", None),
        None,
    )));
    assert_eq!(m.num_quads(), 1);
}

#[test]
fn language_literals_intern_by_tag() {
    let w = World::new();
    let hi_en = w.new_literal(None, "hi", Some("en"));
    assert_eq!(hi_en, w.new_literal(None, "hi", Some("en")));
    assert_ne!(hi_en, w.new_literal(None, "hi", Some("fr")));
}

#[test]
fn object_lookup_works_without_an_object_index() {
    let w = World::new();
    let mut m = Model::with_indices(&w, [Order::Spo], false);
    let (a, b, c, d) = (iri(&w, "a"), iri(&w, "b"), iri(&w, "c"), iri(&w, "d"));
    m.add(Quad::new(a.clone(), b.clone(), c.clone(), None));
    m.add(Quad::new(d.clone(), b.clone(), c.clone(), None));
    m.add(Quad::new(a.clone(), b.clone(), d.clone(), None));

    let found: HashSet<Quad> = m
        .find(&Pattern::new(None, None, Some(c.clone()), None))
        .collect();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|q| q.o() == &c));
}

#[test]
fn triple_in_two_graphs_collapses_once() {
    let w = World::new();
    let mut m = Model::with_indices(&w, [Order::Spo], true);
    let (a, b, c) = (iri(&w, "a"), iri(&w, "b"), iri(&w, "c"));
    let g1 = iri(&w, "g1");
    let g2 = iri(&w, "g2");
    m.add(Quad::new(a.clone(), b.clone(), c.clone(), Some(g1.clone())));
    m.add(Quad::new(a.clone(), b.clone(), c.clone(), Some(g2.clone())));
    assert_eq!(m.num_quads(), 2);

    let collapsed: Vec<Quad> = m.iter().collect();
    assert_eq!(collapsed.len(), 1);
    // the surfaced graph is the first visited, i.e. the least one
    assert_eq!(collapsed[0].g(), Some(&g1));
}

#[test]
fn removal_releases_last_node_references() {
    let w = World::new();
    let mut m = Model::new(&w);
    let before = w.num_nodes();
    {
        let q = Quad::new(iri(&w, "x"), iri(&w, "y"), iri(&w, "z"), None);
        m.add(q.clone());
        assert!(m.find(&Pattern::from(&q)).next().is_some());
        m.remove(&q);
        assert!(m.find(&Pattern::from(&q)).next().is_none());
    }
    assert_eq!(w.num_nodes(), before);
    assert_eq!(m.num_quads(), 0);
}

#[test]
fn add_remove_round_trip_restores_counts() {
    let w = World::new();
    let mut m = Model::with_indices(&w, [Order::Spo, Order::Ops, Order::Pos], true);
    let keep = Quad::new(iri(&w, "s"), iri(&w, "p"), iri(&w, "o"), None);
    m.add(keep.clone());
    let quads_before = m.num_quads();
    let nodes_before = w.num_nodes();

    let extra = Quad::new(iri(&w, "s2"), iri(&w, "p"), iri(&w, "o2"), Some(iri(&w, "g")));
    assert!(m.add(extra.clone()));
    assert!(!m.add(extra.clone()));
    assert_eq!(m.num_quads(), quads_before + 1);
    assert!(m.remove(&extra));
    drop(extra);

    assert_eq!(m.num_quads(), quads_before);
    assert_eq!(w.num_nodes(), nodes_before);
    assert!(m.contains(&keep));
}

/// Build a model whose (S, P, O) combinations are all distinct, spread over
/// the default graph and two named graphs.
fn sample_model(w: &World, graphs: bool) -> (Model, Vec<Quad>) {
    let mut m = Model::with_indices(w, [Order::Spo, Order::Ops], graphs);
    let mut quads = Vec::new();
    let graph_names = [None, Some("g1"), Some("g2")];
    let mut turn = 0;
    for s in ["s1", "s2", "s3"] {
        for p in ["p1", "p2"] {
            for o in ["o1", "o2", "o3"] {
                let g = graph_names[turn % 3].map(|g| iri(w, g));
                turn += 1;
                let q = Quad::new(iri(w, s), iri(w, p), iri(w, o), g);
                assert!(m.add(q.clone()));
                quads.push(q);
            }
        }
    }
    (m, quads)
}

#[test]
fn every_pattern_shape_yields_exactly_the_matching_quads() {
    let w = World::new();
    let (m, quads) = sample_model(&w, true);
    assert_eq!(m.num_quads(), quads.len());

    let s = iri(&w, "s2");
    let p = iri(&w, "p1");
    let o = iri(&w, "o3");
    let g = iri(&w, "g1");
    for mask in 0..16u32 {
        let pattern = Pattern::new(
            (mask & 1 != 0).then(|| s.clone()),
            (mask & 2 != 0).then(|| p.clone()),
            (mask & 4 != 0).then(|| o.clone()),
            (mask & 8 != 0).then(|| g.clone()),
        );
        let expected: HashSet<Quad> = quads
            .iter()
            .filter(|q| pattern.matches(q))
            .cloned()
            .collect();
        let got: HashSet<Quad> = m.find(&pattern).collect();
        assert_eq!(got, expected, "pattern shape {mask:04b}");
    }
}

#[test]
fn every_pattern_shape_is_sound_with_only_the_default_index() {
    let w = World::new();
    let (m, quads) = sample_model(&w, false);

    let s = iri(&w, "s1");
    let p = iri(&w, "p2");
    let o = iri(&w, "o2");
    let g = iri(&w, "g2");
    for mask in 0..16u32 {
        let pattern = Pattern::new(
            (mask & 1 != 0).then(|| s.clone()),
            (mask & 2 != 0).then(|| p.clone()),
            (mask & 4 != 0).then(|| o.clone()),
            (mask & 8 != 0).then(|| g.clone()),
        );
        let expected: HashSet<Quad> = quads
            .iter()
            .filter(|q| pattern.matches(q))
            .cloned()
            .collect();
        let got: HashSet<Quad> = m.find(&pattern).collect();
        assert_eq!(got, expected, "pattern shape {mask:04b}");
    }
}

#[test]
fn iteration_never_decreases() {
    let w = World::new();
    let (m, _) = sample_model(&w, true);
    for order in [Order::Spo, Order::Ops, Order::Gspo, Order::Gops] {
        let mut prev: Option<Quad> = None;
        for q in m.iter_in(order).unwrap() {
            if let Some(prev) = &prev {
                let key = |q: &Quad| {
                    let mut k = [
                        Some(q.s().clone()),
                        Some(q.p().clone()),
                        Some(q.o().clone()),
                        q.g().cloned(),
                    ];
                    // compare in the walked order: most significant first
                    let perm: &[usize] = match order {
                        Order::Spo => &[0, 1, 2, 3],
                        Order::Ops => &[2, 1, 0, 3],
                        Order::Gspo => &[3, 0, 1, 2],
                        Order::Gops => &[3, 2, 1, 0],
                        _ => unreachable!(),
                    };
                    let mut out = [None, None, None, None];
                    for (slot, &from) in out.iter_mut().zip(perm) {
                        *slot = k[from].take();
                    }
                    out
                };
                assert!(key(prev) <= key(&q), "disorder under {order}");
            }
            prev = Some(q);
        }
    }
}

#[test]
fn full_scan_returns_everything_inserted_and_nothing_removed() {
    let w = World::new();
    let (mut m, quads) = sample_model(&w, true);
    let removed: Vec<Quad> = quads.iter().step_by(3).cloned().collect();
    for q in &removed {
        assert!(m.remove(q));
    }
    let left: HashSet<Quad> = m.iter_in(Order::Gspo).unwrap().collect();
    let expected: HashSet<Quad> = quads
        .iter()
        .filter(|q| !removed.contains(q))
        .cloned()
        .collect();
    assert_eq!(left, expected);
}

#[test]
fn parse_store_serialize_round_trip() {
    let nq = "\
<tag:a> <tag:b> \"x\\n\"@en.\n\
<tag:a> <tag:b> <tag:c> <tag:g>.\n\
<tag:a> <tag:b> <tag:c>.\n\
_:b0 <tag:p> \"1\"^^<tag:int> <tag:g>.\n";
    let world = World::new();
    let mut model = Model::with_indices(&world, [Order::Spo, Order::Ops], true);
    let n = parser::read_nquads(nq.as_bytes(), &mut model).unwrap();
    assert_eq!(n, 4);
    assert_eq!(model.num_quads(), 4);

    let mut ser = NqSerializer::new_stringifier();
    ser.serialize(model.iter_in(Order::Gspo).unwrap()).unwrap();
    let mut lines: Vec<&str> = ser.as_str().lines().collect();
    let mut expected: Vec<&str> = nq.lines().collect();
    lines.sort_unstable();
    expected.sort_unstable();
    assert_eq!(lines, expected);

    // N-Triples output collapses the duplicated (a, b, c) triple; IRIs rank
    // before literals, blank subjects after IRI subjects
    let mut ser = NtSerializer::new_stringifier();
    ser.serialize(model.iter()).unwrap();
    assert_eq!(
        ser.as_str(),
        "<tag:a> <tag:b> <tag:c>.\n\
         <tag:a> <tag:b> \"x\\n\"@en.\n\
         _:b0 <tag:p> \"1\"^^<tag:int>.\n"
    );
}

#[test]
fn worlds_are_shared_between_models() {
    let w = World::new();
    let mut m1 = Model::new(&w);
    let mut m2 = Model::with_indices(&w, [Order::Pos], false);
    let q = Quad::new(iri(&w, "a"), iri(&w, "b"), iri(&w, "c"), None);
    m1.add(q.clone());
    m2.add(q.clone());
    drop(m1);
    // the nodes survive as long as any model or handle uses them
    assert_eq!(w.num_nodes(), 3);
    m2.remove(&q);
    drop(q);
    assert_eq!(w.num_nodes(), 0);
}
