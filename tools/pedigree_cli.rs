/// Pedigree CLI: grow a family tree and write it out.
///
/// Usage: pedigree_cli [--start-year <n>] [--generations <n>] [--seed <n>]
///                     [--config <ron>] [--names <ron>] [--input <csv>]
///                     [--output <csv>] [--summary] [--graphviz <dot>]
///
/// Without `--output` the tree is written to stdout as CSV.
use clap::Parser;
use pedigree::core::genealogist::{GenealogyError, Genealogist};
use pedigree::core::report;
use pedigree::core::rows;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pedigree_cli")]
#[command(about = "Generate a multi-generational fictional family tree")]
struct Args {
    /// Birth year of the founding ancestor
    #[arg(long, default_value_t = 0, allow_negative_numbers = true,
          value_parser = clap::value_parser!(i32).range(-1_000_000..=1_000_000))]
    start_year: i32,

    /// Number of generations to grow
    #[arg(long, default_value_t = 5)]
    generations: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Generation tunables (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name pools (RON)
    #[arg(long)]
    names: Option<PathBuf>,

    /// Continue growing a tree previously written as CSV
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the tree as CSV to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print a text summary of every union
    #[arg(long)]
    summary: bool,

    /// Write Graphviz instructions to this file
    #[arg(long)]
    graphviz: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), GenealogyError> {
    let mut builder = Genealogist::builder();
    if let Some(path) = &args.config {
        builder = builder.config_path(&path.to_string_lossy());
    }
    if let Some(path) = &args.names {
        builder = builder.names_path(&path.to_string_lossy());
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let mut genealogist = builder.build()?;

    let tree = match &args.input {
        Some(path) => genealogist.load_csv(path)?,
        None => genealogist.seed_tree(args.start_year)?,
    };
    let tree = genealogist.expand(tree, args.generations)?;

    match &args.output {
        Some(path) => genealogist.save_csv(&tree, path)?,
        None if !args.summary => rows::write_csv(&tree, io::stdout().lock())?,
        None => {}
    }
    if args.summary {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", report::summary(&tree))?;
    }
    if let Some(path) = &args.graphviz {
        std::fs::write(path, report::graphviz(&tree))?;
        tracing::info!(path = %path.display(), "graphviz instructions written");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
