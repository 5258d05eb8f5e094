use anyhow::Result;
use clap::{ArgAction, Parser};
use lardata_common::{
    Tick,
    tracer::{TracerEngine, TracerOptions},
};
use std::{io, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};

mod records;

/// Prints the data products listed in a JSON file.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON list of records, each tagged with its `record-type`.
    #[clap(env = "PRODUCT_DUMP_FILE")]
    file: PathBuf,

    /// Overrides RUST_LOG.
    #[clap(long, env = "PRODUCT_DUMP_LOG_LEVEL")]
    log_level: Option<LevelFilter>,

    /// Groups records by type and orders space points, edges, flashes and channels by their key.
    #[clap(long)]
    sort: bool,

    /// Inclusive tick range over which channel deposits are summarised per track.
    #[clap(long, num_args = 2, value_names = ["START", "END"], action = ArgAction::Set)]
    window: Option<Vec<Tick>>,
}

impl Cli {
    fn window(&self) -> Result<Option<(Tick, Tick)>> {
        match self.window.as_deref() {
            None => Ok(None),
            Some(&[start, end]) => Ok(Some((start, end))),
            Some(values) => anyhow::bail!("--window takes START and END, got {values:?}"),
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let _tracer = TracerEngine::new(TracerOptions {
        level: args.log_level,
    })?;

    let mut records = records::load(&args.file)?;
    info!(file = %args.file.display(), records = records.len(), "Loaded records");

    if args.sort {
        records::sort_records(&mut records);
    }

    let window = args.window()?;
    records::write_report(&mut io::stdout().lock(), &records, window)?;
    Ok(())
}
