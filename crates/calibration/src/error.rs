use core::fmt;
use std::io;

use bstr::{BStr, BString};

/// Errors raised while building an [Automaton][crate::Automaton].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AutomatonError {
    /// A word without any bytes.
    EmptyWord { index: usize },
    /// A word mapped to something which isn't a single digit.
    BadDigit { word: BString, value: u8 },
    /// Folding a word overflowed the accumulator.
    Overflow { word: BString },
    /// Two words fold into the same state with different markers.
    Conflict {
        word: BString,
        state: u32,
        existing: crate::State,
        new: crate::State,
    },
    /// The table is out of capacity.
    Capacity(usize),
}

impl fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonError::EmptyWord { index } => write!(f, "word #{index} is empty"),
            AutomatonError::BadDigit { word, value } => {
                write!(f, "word {word:?} maps to {value}, which is not a digit")
            }
            AutomatonError::Overflow { word } => {
                write!(f, "word {word:?} overflows the state accumulator")
            }
            AutomatonError::Conflict {
                word,
                state,
                existing,
                new,
            } => write!(
                f,
                "word {word:?} folds into state {state} as {new}, but it is already {existing}"
            ),
            AutomatonError::Capacity(cap) => write!(f, "automaton out of capacity ({cap})"),
        }
    }
}

impl std::error::Error for AutomatonError {}

/// Errors raised for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineError {
    /// The line has no numeral and no digit word.
    MissingDigit { line: usize, contents: BString },
}

impl LineError {
    pub(crate) fn missing_digit(line: usize, contents: &[u8]) -> Self {
        LineError::MissingDigit {
            line,
            contents: BString::from(contents),
        }
    }

    /// The 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            LineError::MissingDigit { line, .. } => *line,
        }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::MissingDigit { line, contents } => {
                write!(
                    f,
                    "line {line}: no digit in {contents:?}",
                    contents = BStr::new(contents)
                )
            }
        }
    }
}

impl std::error::Error for LineError {}

/// Error raised while consuming a stream.
#[derive(Debug)]
#[non_exhaustive]
pub enum StreamError {
    /// Reading from the input failed.
    Io(io::Error),
    /// A line was rejected.
    Line(LineError),
    /// Input can't be read in chunks of zero bytes.
    ZeroChunkSize,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Io(..) => write!(f, "failed to read input"),
            StreamError::Line(e) => e.fmt(f),
            StreamError::ZeroChunkSize => write!(f, "chunk size must be non-zero"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Io(e) => Some(e),
            StreamError::Line(..) | StreamError::ZeroChunkSize => None,
        }
    }
}

impl From<io::Error> for StreamError {
    #[inline]
    fn from(error: io::Error) -> Self {
        StreamError::Io(error)
    }
}

impl From<LineError> for StreamError {
    #[inline]
    fn from(error: LineError) -> Self {
        StreamError::Line(error)
    }
}
