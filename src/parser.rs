//! Reader adapter: load RDF documents into a [`Model`].
//!
//! Parsing proper is delegated to the RIO parsers; this module converts the
//! parsed terms into interned nodes of the model's world and feeds the
//! statements to [`Model::add`]. Duplicate statements in the input are
//! harmless (`add` reports them and leaves the store unchanged).

use std::io::BufRead;

use oxiri::Iri;
use rio_api::model as rio;
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{NQuadsParser, NTriplesParser, TriGParser, TurtleError, TurtleParser};
use thiserror::Error;

use crate::model::Model;
use crate::node::{Node, NodeFlags, HAS_NEWLINE, HAS_QUOTE};
use crate::quad::Quad;
use crate::world::World;

/// Errors from the reader adapter.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Syntax or IO error from the underlying parser.
    #[error(transparent)]
    Syntax(#[from] TurtleError),
    /// The base IRI is not a valid absolute IRI.
    #[error("invalid base IRI `{0}`")]
    InvalidBaseIri(String),
    /// A construct the store has no representation for.
    #[error("unsupported construct: {0}")]
    Unsupported(&'static str),
}

/// Read a Turtle document, adding its triples to the default graph of
/// `model`. Returns the number of statements parsed.
pub fn read_turtle<R: BufRead>(
    read: R,
    base: Option<&str>,
    model: &mut Model,
) -> Result<usize, ParseError> {
    load_triples(&mut TurtleParser::new(read, parse_base(base)?), model)
}

/// Read a TriG document, adding its quads to `model`.
pub fn read_trig<R: BufRead>(
    read: R,
    base: Option<&str>,
    model: &mut Model,
) -> Result<usize, ParseError> {
    load_quads(&mut TriGParser::new(read, parse_base(base)?), model)
}

/// Read an N-Triples document, adding its triples to the default graph of
/// `model`.
pub fn read_ntriples<R: BufRead>(read: R, model: &mut Model) -> Result<usize, ParseError> {
    load_triples(&mut NTriplesParser::new(read), model)
}

/// Read an N-Quads document, adding its quads to `model`.
pub fn read_nquads<R: BufRead>(read: R, model: &mut Model) -> Result<usize, ParseError> {
    load_quads(&mut NQuadsParser::new(read), model)
}

fn parse_base(base: Option<&str>) -> Result<Option<Iri<String>>, ParseError> {
    base.map(|b| {
        Iri::parse(b.to_string()).map_err(|_| ParseError::InvalidBaseIri(b.to_string()))
    })
    .transpose()
}

fn load_triples<P>(parser: &mut P, model: &mut Model) -> Result<usize, ParseError>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let world = model.world().clone();
    let mut n = 0;
    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        let quad = convert_triple(&world, &t, None)?;
        model.add(quad);
        n += 1;
        Ok(())
    })?;
    Ok(n)
}

fn load_quads<P>(parser: &mut P, model: &mut Model) -> Result<usize, ParseError>
where
    P: QuadsParser,
    ParseError: From<P::Error>,
{
    let world = model.world().clone();
    let mut n = 0;
    parser.parse_all(&mut |q| -> Result<(), ParseError> {
        let g = q.graph_name.as_ref().map(|g| graph_node(&world, g));
        let quad = Quad::new(
            subject_node(&world, &q.subject)?,
            world.new_iri(q.predicate.iri),
            term_node(&world, &q.object)?,
            g,
        );
        model.add(quad);
        n += 1;
        Ok(())
    })?;
    Ok(n)
}

fn convert_triple(world: &World, t: &rio::Triple, g: Option<Node>) -> Result<Quad, ParseError> {
    Ok(Quad::new(
        subject_node(world, &t.subject)?,
        world.new_iri(t.predicate.iri),
        term_node(world, &t.object)?,
        g,
    ))
}

fn subject_node(world: &World, s: &rio::Subject) -> Result<Node, ParseError> {
    match s {
        rio::Subject::NamedNode(n) => Ok(world.new_iri(n.iri)),
        rio::Subject::BlankNode(b) => Ok(world.new_blank(b.id)),
        rio::Subject::Triple(_) => Err(ParseError::Unsupported("RDF-star quoted triple")),
    }
}

fn term_node(world: &World, t: &rio::Term) -> Result<Node, ParseError> {
    match t {
        rio::Term::NamedNode(n) => Ok(world.new_iri(n.iri)),
        rio::Term::BlankNode(b) => Ok(world.new_blank(b.id)),
        rio::Term::Literal(l) => Ok(literal_node(world, l)),
        rio::Term::Triple(_) => Err(ParseError::Unsupported("RDF-star quoted triple")),
    }
}

fn graph_node(world: &World, g: &rio::GraphName) -> Node {
    match g {
        rio::GraphName::NamedNode(n) => world.new_iri(n.iri),
        rio::GraphName::BlankNode(b) => world.new_blank(b.id),
    }
}

fn literal_node(world: &World, l: &rio::Literal) -> Node {
    match l {
        rio::Literal::Simple { value } => {
            world.new_literal_with_flags(None, value, None, literal_flags(value))
        }
        rio::Literal::LanguageTaggedString { value, language } => {
            world.new_literal_with_flags(None, value, Some(language), literal_flags(value))
        }
        rio::Literal::Typed { value, datatype } => {
            let dt = world.new_iri(datatype.iri);
            world.new_literal_with_flags(Some(&dt), value, None, literal_flags(value))
        }
    }
}

/// Escape hints for writers, computed once at parse time.
fn literal_flags(lexical: &str) -> NodeFlags {
    let mut flags = 0;
    if lexical.contains(['\n', '\r']) {
        flags |= HAS_NEWLINE;
    }
    if lexical.contains('"') {
        flags |= HAS_QUOTE;
    }
    flags
}
