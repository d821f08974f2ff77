use std::fs::File;
use std::io::Write;
use std::path::Path;

use calibration::cli::{Bencher, Mode, Opts, Output};
use calibration::consume;
use calibration::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
enum Error {
    #[error("{}: failed to open input", .0.display())]
    Open(Box<Path>),
    #[error("{}: failed to read input", .0.display())]
    Read(Box<Path>),
    #[error("{}: bad input", .0.display())]
    BadInput(Box<Path>),
}

fn main() -> Result<()> {
    let opts = Opts::parse()?;

    let stdout = std::io::stdout();
    let mut o = Output::new(stdout.lock(), opts.output_kind());

    let Err(error) = run(&opts, &mut o) else {
        return Ok(());
    };

    if opts.json {
        o.error(format_args!("{error:#}"))?;
        o.flush()?;
        std::process::exit(1);
    }

    Err(error)
}

fn run(opts: &Opts, o: &mut Output<impl Write>) -> Result<()> {
    // Built up front so a broken table fails before any input is read.
    let automaton = Automaton::global()?;

    let scanner = if opts.literal {
        Scanner::literal()
    } else {
        Scanner::new(automaton)
    };

    let path = opts.path.as_path();

    match opts.mode {
        Mode::Default => {
            let file = File::open(path).with_context(|| Error::Open(path.into()))?;

            let total = consume(file, opts.chunk_size, scanner, opts.policy)
                .with_context(|| Error::BadInput(path.into()))?;

            log::debug!(
                "{}: {} lines, {} skipped, {} trailing bytes",
                path.display(),
                total.lines,
                total.skipped,
                total.trailing
            );

            o.total(&total)?;
        }
        Mode::Bench => {
            let data = std::fs::read(path).with_context(|| Error::Read(path.into()))?;

            let mut b = Bencher::new();

            let report = b.iter(opts, o, || {
                consume(&data[..], opts.chunk_size, scanner, opts.policy)
                    .map(|total| total.sum)
                    .with_context(|| Error::BadInput(path.into()))
            })?;

            o.report(&report)?;
        }
    }

    Ok(())
}
