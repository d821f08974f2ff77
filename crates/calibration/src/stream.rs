//! Reassembling lines from chunked input.


use std::io::{self, Read};

use serde::{Deserialize, Serialize};

use crate::error::{LineError, StreamError};
use crate::scan::Scanner;

/// Line terminator.
pub const NL: u8 = b'\n';

/// Default size of chunks read from input.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// What to do with a line that has no digits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// Fail with [LineError::MissingDigit].
    #[default]
    Fail,
    /// Count the line as zero.
    Skip,
}

/// What to do with bytes following the last line terminator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Trailing {
    /// Ignore them.
    #[default]
    Drop,
    /// Scan them as a final line.
    Scan,
}

/// Policies applied while tokenizing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub missing: Missing,
    pub trailing: Trailing,
}

/// The outcome of consuming a stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Total {
    /// Sum of all line values.
    pub sum: u64,
    /// Number of lines scanned.
    pub lines: usize,
    /// Number of lines skipped because they had no digits.
    pub skipped: usize,
    /// Number of trailing unterminated bytes which were dropped.
    pub trailing: usize,
}

/// Splits chunks of input into lines and sums up their values.
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    policy: Policy,
    /// Unterminated bytes from previous chunks.
    carry: Vec<u8>,
    total: Total,
}

impl<'a> Tokenizer<'a> {
    /// Construct a new tokenizer.
    pub fn new(scanner: Scanner<'a>, policy: Policy) -> Self {
        Self {
            scanner,
            policy,
            carry: Vec::new(),
            total: Total::default(),
        }
    }

    /// Process the next chunk of input.
    ///
    /// # Examples
    ///
    /// ```
    /// use calibration::{Automaton, Policy, Scanner, Tokenizer};
    ///
    /// let automaton = Automaton::new()?;
    /// let mut tokenizer = Tokenizer::new(Scanner::new(&automaton), Policy::default());
    ///
    /// tokenizer.push(b"1abc2\npqr3st")?;
    /// tokenizer.push(b"u8vwx\n")?;
    ///
    /// assert_eq!(tokenizer.finish()?.sum, 50);
    /// # Ok::<_, anyhow::Error>(())
    /// ```
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), LineError> {
        let mut start = 0;

        for k in memchr::memchr_iter(NL, chunk) {
            let line = &chunk[start..k];
            start = k + 1;

            if self.carry.is_empty() {
                self.line(line)?;
                continue;
            }

            let mut carry = std::mem::take(&mut self.carry);
            carry.extend_from_slice(line);
            let result = self.line(&carry);
            carry.clear();
            self.carry = carry;
            result?;
        }

        self.carry.extend_from_slice(&chunk[start..]);

        Ok(())
    }

    /// Finish the stream, handling any unterminated final line.
    pub fn finish(mut self) -> Result<Total, LineError> {
        if !self.carry.is_empty() {
            match self.policy.trailing {
                Trailing::Drop => {
                    log::warn!(
                        "dropping {} unterminated bytes after line {}",
                        self.carry.len(),
                        self.total.lines + self.total.skipped
                    );
                    self.total.trailing = self.carry.len();
                }
                Trailing::Scan => {
                    let carry = std::mem::take(&mut self.carry);
                    self.line(&carry)?;
                }
            }
        }

        Ok(self.total)
    }

    fn line(&mut self, line: &[u8]) -> Result<(), LineError> {
        let n = self.total.lines + self.total.skipped + 1;

        let Some(digits) = self.scanner.scan(line) else {
            return match self.policy.missing {
                Missing::Fail => Err(LineError::missing_digit(n, line)),
                Missing::Skip => {
                    log::warn!("line {n}: skipping line without digits");
                    self.total.skipped += 1;
                    Ok(())
                }
            };
        };

        log::trace!("line {n}: {}", digits.value());
        self.total.sum += u64::from(digits.value());
        self.total.lines += 1;
        Ok(())
    }
}

/// Consume a reader in chunks of at most `chunk_size` bytes.
///
/// A `chunk_size` of zero is rejected with [StreamError::ZeroChunkSize].
pub fn consume<R>(
    mut reader: R,
    chunk_size: usize,
    scanner: Scanner<'_>,
    policy: Policy,
) -> Result<Total, StreamError>
where
    R: Read,
{
    if chunk_size == 0 {
        return Err(StreamError::ZeroChunkSize);
    }

    let mut tokenizer = Tokenizer::new(scanner, policy);
    let mut buf = vec![0; chunk_size];
    let mut chunks = 0usize;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        chunks += 1;
        tokenizer.push(&buf[..n])?;
    }

    log::debug!("consumed {chunks} chunks");
    Ok(tokenizer.finish()?)
}

/// Consume an in-memory sequence of chunks.
///
/// # Examples
///
/// ```
/// use calibration::{consume_chunks, Automaton, Policy, Scanner};
///
/// let automaton = Automaton::new()?;
/// let chunks = [&b"two1ni"[..], &b"ne\ntreb7"[..], &b"uchet\n"[..]];
/// let total = consume_chunks(chunks, Scanner::new(&automaton), Policy::default())?;
///
/// assert_eq!(total.sum, 29 + 77);
/// assert_eq!(total.lines, 2);
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn consume_chunks<'c, I>(
    chunks: I,
    scanner: Scanner<'_>,
    policy: Policy,
) -> Result<Total, LineError>
where
    I: IntoIterator<Item = &'c [u8]>,
{
    let mut tokenizer = Tokenizer::new(scanner, policy);

    for chunk in chunks {
        tokenizer.push(chunk)?;
    }

    tokenizer.finish()
}
