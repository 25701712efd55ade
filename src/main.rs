//! Command-line driver: load RDF documents into an in-memory store and
//! reserialize them.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use skein::serializer::{NqSerializer, NtSerializer};
use skein::{parser, Model, Order, World};

#[derive(Debug, Parser)]
#[command(
    name = "skein",
    version,
    about = "Load RDF documents into an in-memory quad store and reserialize them"
)]
struct Cli {
    /// Input files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Base IRI for resolving relative IRIs (Turtle and TriG input)
    #[arg(short, long)]
    base: Option<String>,

    /// Input syntax
    #[arg(short, long, value_enum, default_value_t = InputSyntax::Turtle)]
    input: InputSyntax,

    /// Output syntax
    #[arg(short, long, value_enum, default_value_t = OutputSyntax::Ntriples)]
    output: OutputSyntax,

    /// Index orders to maintain
    #[arg(long, value_delimiter = ',', default_values_t = [Order::Spo, Order::Ops])]
    index: Vec<Order>,

    /// Also maintain graph-prefixed indices (implied by N-Quads output)
    #[arg(short, long)]
    graphs: bool,

    /// Log progress at info level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputSyntax {
    Turtle,
    Trig,
    Ntriples,
    Nquads,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputSyntax {
    Ntriples,
    Nquads,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if cli.verbose {
        "info"
    } else {
        "warn"
    }))
    .init();

    let graphs = cli.graphs || cli.output == OutputSyntax::Nquads;
    let world = World::new();
    let mut model = Model::with_indices(&world, cli.index.iter().copied(), graphs);

    for path in &cli.inputs {
        let file =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let read = BufReader::new(file);
        let base = cli.base.as_deref();
        let n = match cli.input {
            InputSyntax::Turtle => parser::read_turtle(read, base, &mut model),
            InputSyntax::Trig => parser::read_trig(read, base, &mut model),
            InputSyntax::Ntriples => parser::read_ntriples(read, &mut model),
            InputSyntax::Nquads => parser::read_nquads(read, &mut model),
        }
        .with_context(|| format!("cannot parse {}", path.display()))?;
        info!("{}: {} statements", path.display(), n);
    }
    info!(
        "{} quads stored, {} nodes interned",
        model.num_quads(),
        world.num_nodes()
    );

    let out = BufWriter::new(io::stdout().lock());
    match cli.output {
        OutputSyntax::Ntriples => {
            let mut ser = NtSerializer::new(out);
            ser.serialize(model.iter())?;
            ser.into_inner().flush()?;
        }
        OutputSyntax::Nquads => {
            let quads = model
                .iter_in(Order::DEFAULT_GRAPH)
                .unwrap_or_else(|| model.iter());
            let mut ser = NqSerializer::new(out);
            ser.serialize(quads)?;
            ser.into_inner().flush()?;
        }
    }
    Ok(())
}
