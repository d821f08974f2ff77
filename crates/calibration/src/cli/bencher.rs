use core::fmt;
use std::hint::black_box;
use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{bail, Error, Result};

use crate::cli::{Opts, Output, Report};

/// Default warmup period in milliseconds.
const DEFAULT_WARMUP: u64 = 100;

/// Default time in milliseconds.
const DEFAULT_TIME_LIMIT: u64 = 400;

/// Runs a closure repeatedly and times it.
pub struct Bencher<O> {
    expected: Option<O>,
}

impl<O> Default for Bencher<O> {
    #[inline]
    fn default() -> Self {
        Self { expected: None }
    }
}

impl<O> Bencher<O>
where
    O: fmt::Debug + PartialEq,
{
    /// Construct a new bencher.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bench the given fn.
    ///
    /// Every run must produce the same value as the first run.
    pub fn iter<T, E>(
        &mut self,
        opts: &Opts,
        o: &mut Output<impl Write>,
        mut iter: T,
    ) -> Result<Report>
    where
        T: FnMut() -> Result<O, E>,
        Error: From<E>,
    {
        let warmup = Duration::from_millis(opts.warmup.unwrap_or(DEFAULT_WARMUP));
        let time_limit = Duration::from_millis(opts.time_limit.unwrap_or(DEFAULT_TIME_LIMIT));

        if !warmup.is_zero() {
            let s = Instant::now();

            o.info(format_args!("warming up ({warmup:?})..."))?;

            loop {
                let value = iter()?;
                let after = Instant::now();
                self.check(black_box(value))?;

                if after.duration_since(s) >= warmup {
                    break;
                }
            }
        }

        let mut samples = Vec::new();

        if let Some(count) = opts.count {
            o.info(format_args!("running benches {count} time(s)..."))?;

            for _ in 0..count {
                samples.push(self.sample(&mut iter)?.0);
            }
        } else {
            o.info(format_args!("running benches ({time_limit:?})..."))?;

            let start = Instant::now();

            loop {
                let (sample, after) = self.sample(&mut iter)?;
                samples.push(sample);

                if after.duration_since(start) >= time_limit {
                    break;
                }
            }
        }

        Ok(Report::from_samples(&mut samples))
    }

    /// Time a single run, returning the sample and when it finished.
    fn sample<T, E>(&mut self, iter: &mut T) -> Result<(Duration, Instant)>
    where
        T: FnMut() -> Result<O, E>,
        Error: From<E>,
    {
        let before = Instant::now();
        let value = iter()?;
        let after = Instant::now();
        self.check(black_box(value))?;
        Ok((after.duration_since(before), after))
    }

    fn check(&mut self, value: O) -> Result<()> {
        if let Some(expected) = &self.expected {
            if *expected != value {
                bail!("{value:?} (value) != {expected:?} (expected)");
            }

            return Ok(());
        }

        self.expected = Some(value);
        Ok(())
    }
}
