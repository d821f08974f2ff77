//! CLI helpers.

mod bencher;
mod output;
mod stderr_logger;

#[cfg(test)]
mod tests;

use core::fmt;
use core::time::Duration;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::stream::{Missing, Policy, Trailing, DEFAULT_CHUNK_SIZE};

pub use self::bencher::Bencher;
pub use self::output::{Output, OutputKind};

static STDERR_LOGGER: stderr_logger::StderrLogger = stderr_logger::StderrLogger;

/// Input file used if none is specified.
pub const DEFAULT_PATH: &str = "data";

/// Run mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Default run mode.
    #[default]
    Default,
    /// Run as benchmark.
    Bench,
}

/// Input options.
#[derive(Debug)]
pub struct Opts {
    /// Run as a benchmark.
    pub mode: Mode,
    /// The input file.
    pub path: PathBuf,
    /// Size of chunks read from the input.
    pub chunk_size: usize,
    /// Line handling policies.
    pub policy: Policy,
    /// Only recognize numerals.
    pub literal: bool,
    /// Run in verbose mode.
    pub verbose: bool,
    /// Output JSON.
    pub json: bool,
    /// Warmup period.
    pub warmup: Option<u64>,
    /// Bench period.
    pub time_limit: Option<u64>,
    /// Number of times to run benches.
    pub count: Option<usize>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            path: PathBuf::from(DEFAULT_PATH),
            chunk_size: DEFAULT_CHUNK_SIZE,
            policy: Policy::default(),
            literal: false,
            verbose: false,
            json: false,
            warmup: None,
            time_limit: None,
            count: None,
        }
    }
}

impl Opts {
    /// Parse CLI options and install the logger.
    pub fn parse() -> Result<Self> {
        let opts = Self::parse_from(std::env::args_os().skip(1))?;

        if !opts.json {
            let level = if opts.verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            };

            log::set_max_level(level);
            log::set_logger(&STDERR_LOGGER)
                .map_err(|error| anyhow!("failed to set log: {error}"))?;
        }

        Ok(opts)
    }

    /// Parse options from the given arguments, not including the program
    /// name.
    pub fn parse_from<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut opts = Self::default();
        let mut it = args.into_iter();
        let mut path = None;

        while let Some(arg) = it.next() {
            let Some(arg) = arg.to_str() else {
                // Only the input path may be non-utf8.
                set_path(&mut path, arg)?;
                continue;
            };

            match arg {
                "--bench" => {
                    if !matches!(opts.mode, Mode::Default) {
                        bail!("duplicate `--bench` arguments");
                    }

                    opts.mode = Mode::Bench;
                }
                "--verbose" => {
                    opts.verbose = true;
                }
                "--json" => {
                    opts.json = true;
                }
                "--literal" => {
                    opts.literal = true;
                }
                "--chunk-size" => {
                    let chunk_size: usize = value(&mut it, "--chunk-size")?;

                    if chunk_size == 0 {
                        bail!("bad argument to `--chunk-size`: must be non-zero");
                    }

                    opts.chunk_size = chunk_size;
                }
                "--missing" => {
                    opts.policy.missing = match string(&mut it, "--missing")?.as_str() {
                        "fail" => Missing::Fail,
                        "skip" => Missing::Skip,
                        other => bail!("bad argument to `--missing`: {other}"),
                    };
                }
                "--trailing" => {
                    opts.policy.trailing = match string(&mut it, "--trailing")?.as_str() {
                        "drop" => Trailing::Drop,
                        "scan" => Trailing::Scan,
                        other => bail!("bad argument to `--trailing`: {other}"),
                    };
                }
                "--warmup" => {
                    opts.warmup = Some(value(&mut it, "--warmup")?);
                }
                "--time-limit" => {
                    opts.time_limit = Some(value(&mut it, "--time-limit")?);
                }
                "--count" => {
                    let count: usize = value(&mut it, "--count")?;

                    if count == 0 {
                        bail!("bad argument to `--count`: must be non-zero");
                    }

                    opts.count = Some(count);
                }
                "--" => {
                    break;
                }
                other if other.starts_with("--") => {
                    bail!("unsupported argument: {other}");
                }
                other => {
                    set_path(&mut path, OsString::from(other))?;
                }
            }
        }

        for arg in it {
            set_path(&mut path, arg)?;
        }

        if let Some(path) = path {
            opts.path = path;
        }

        Ok(opts)
    }

    /// The kind of output to produce.
    pub fn output_kind(&self) -> OutputKind {
        if self.json {
            OutputKind::Json
        } else {
            OutputKind::Normal
        }
    }
}

fn set_path(path: &mut Option<PathBuf>, arg: OsString) -> Result<()> {
    if let Some(existing) = path {
        bail!(
            "unexpected argument `{}`, input is already `{}`",
            arg.to_string_lossy(),
            existing.display()
        );
    }

    *path = Some(PathBuf::from(arg));
    Ok(())
}

fn string<I>(it: &mut I, name: &str) -> Result<String>
where
    I: Iterator<Item = OsString>,
{
    let value = it
        .next()
        .with_context(|| anyhow!("missing argument to `{name}`"))?;

    let Ok(value) = value.into_string() else {
        bail!("missing string argument to `{name}`");
    };

    Ok(value)
}

fn value<I, T>(it: &mut I, name: &str) -> Result<T>
where
    I: Iterator<Item = OsString>,
    T: core::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = string(it, name)?;
    value
        .parse()
        .with_context(|| anyhow!("bad argument to `{name}`"))
}

/// Timing report from a benchmark.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Report {
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub count: usize,
    pub min: Duration,
    pub max: Duration,
    pub avg: Duration,
}

impl Report {
    /// Construct a report out of the given samples.
    pub fn from_samples(samples: &mut [Duration]) -> Self {
        samples.sort();

        let count = samples.len();
        let sum = samples.iter().sum::<Duration>();

        let avg = if count == 0 {
            Duration::default()
        } else {
            Duration::from_nanos(
                u64::try_from(sum.as_nanos() / (count as u128)).unwrap_or_default(),
            )
        };

        Self {
            p50: percentile(samples, 50),
            p95: percentile(samples, 95),
            p99: percentile(samples, 99),
            count,
            min: samples.first().copied().unwrap_or_default(),
            max: samples.last().copied().unwrap_or_default(),
            avg,
        }
    }
}

/// Get the given percentile out of sorted samples.
fn percentile(samples: &[Duration], p: usize) -> Duration {
    let Some(last) = samples.len().checked_sub(1) else {
        return Duration::default();
    };

    samples[last * p / 100]
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report {
            p50,
            p95,
            p99,
            count,
            min,
            max,
            avg,
        } = self;

        write!(f, "count: {count}, min: {min:?}, max: {max:?}, avg: {avg:?}, 50th: {p50:?}, 95th: {p95:?}, 99th: {p99:?}")
    }
}
