//! Writer adapter: serialize quads as N-Triples or N-Quads.
//!
//! The writers make no effort to minimize the number of write operations,
//! so in most cases they should be handed a `BufWriter`. N-Triples output is
//! meant to be fed from graph-collapsing iteration ([`Model::iter`]); the
//! N-Quads writer emits the graph position when present, so feed it a
//! graph-prefixed order ([`Model::iter_in`]) to write every graph.
//!
//! [`Model::iter`]: crate::model::Model::iter
//! [`Model::iter_in`]: crate::model::Model::iter_in

use std::io;

use crate::node::{Node, NodeKind};
use crate::quad::Quad;

/// Write `node` in N-Triples term syntax.
pub fn write_node<W: io::Write>(w: &mut W, node: &Node) -> io::Result<()> {
    match node.kind() {
        NodeKind::Iri => {
            w.write_all(b"<")?;
            w.write_all(node.as_str().as_bytes())?;
            w.write_all(b">")
        }
        NodeKind::Blank => {
            w.write_all(b"_:")?;
            w.write_all(node.as_str().as_bytes())
        }
        NodeKind::Literal => {
            w.write_all(b"\"")?;
            quoted(w, node.as_str())?;
            w.write_all(b"\"")?;
            if let Some(tag) = node.language() {
                w.write_all(b"@")?;
                w.write_all(tag.as_bytes())
            } else if let Some(dt) = node.datatype() {
                w.write_all(b"^^")?;
                write_node(w, dt)
            } else {
                Ok(())
            }
        }
    }
}

fn quoted<W: io::Write>(w: &mut W, txt: &str) -> io::Result<()> {
    let bytes = txt.as_bytes();
    let mut start = 0;
    for (pos, &b) in bytes.iter().enumerate() {
        let escaped: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            _ => continue,
        };
        w.write_all(&bytes[start..pos])?;
        w.write_all(escaped)?;
        start = pos + 1;
    }
    w.write_all(&bytes[start..])
}

fn write_spo<W: io::Write>(w: &mut W, quad: &Quad) -> io::Result<()> {
    write_node(w, quad.s())?;
    w.write_all(b" ")?;
    write_node(w, quad.p())?;
    w.write_all(b" ")?;
    write_node(w, quad.o())
}

/// N-Triples serializer. The graph position is dropped.
pub struct NtSerializer<W> {
    write: W,
}

impl<W: io::Write> NtSerializer<W> {
    /// A serializer writing to `write`.
    pub fn new(write: W) -> Self {
        NtSerializer { write }
    }

    /// Write one line per quad of `quads`.
    pub fn serialize<I>(&mut self, quads: I) -> io::Result<()>
    where
        I: IntoIterator<Item = Quad>,
    {
        for quad in quads {
            write_spo(&mut self.write, &quad)?;
            self.write.write_all(b".\n")?;
        }
        Ok(())
    }

    /// Consume the serializer, returning the writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

impl NtSerializer<Vec<u8>> {
    /// A serializer writing to an in-memory buffer.
    pub fn new_stringifier() -> Self {
        NtSerializer::new(Vec::new())
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.write).expect("serializer output is UTF-8")
    }
}

/// N-Quads serializer. Default-graph quads serialize as triples.
pub struct NqSerializer<W> {
    write: W,
}

impl<W: io::Write> NqSerializer<W> {
    /// A serializer writing to `write`.
    pub fn new(write: W) -> Self {
        NqSerializer { write }
    }

    /// Write one line per quad of `quads`.
    pub fn serialize<I>(&mut self, quads: I) -> io::Result<()>
    where
        I: IntoIterator<Item = Quad>,
    {
        for quad in quads {
            write_spo(&mut self.write, &quad)?;
            if let Some(g) = quad.g() {
                self.write.write_all(b" ")?;
                write_node(&mut self.write, g)?;
            }
            self.write.write_all(b".\n")?;
        }
        Ok(())
    }

    /// Consume the serializer, returning the writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

impl NqSerializer<Vec<u8>> {
    /// A serializer writing to an in-memory buffer.
    pub fn new_stringifier() -> Self {
        NqSerializer::new(Vec::new())
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.write).expect("serializer output is UTF-8")
    }
}
