//! Recover calibration values from lines of text.
//!
//! Each line contributes the number formed by its first and last digit, where
//! a digit is either a numeral or a spelled-out word like `seven`. Spelled
//! words are recognized through an [Automaton] keyed by folding bytes with
//! [pair()], and lines are reassembled from chunks of input by a [Tokenizer].
//!
//! ```
//! use calibration::{consume, Automaton, Policy, Scanner};
//!
//! let automaton = Automaton::new()?;
//! let input = &b"two1nine\nabcone2threexyz\n"[..];
//!
//! let total = consume(input, 4, Scanner::new(&automaton), Policy::default())?;
//! assert_eq!(total.sum, 29 + 13);
//! # Ok::<_, anyhow::Error>(())
//! ```

pub mod cli;

mod automaton;
mod error;
mod pair;
mod scan;
mod stream;

pub use self::automaton::{Automaton, State, CAPACITY, DIGIT_WORDS};
pub use self::error::{AutomatonError, LineError, StreamError};
pub use self::pair::{fold, pair};
pub use self::scan::{Digits, Scanner};
pub use self::stream::{
    consume, consume_chunks, Missing, Policy, Tokenizer, Total, Trailing, DEFAULT_CHUNK_SIZE, NL,
};

pub mod prelude {
    //! Helper prelude with useful imports.
    pub use crate::{Automaton, Policy, Scanner, Total};
    pub use anyhow::{anyhow, bail, Context, Result};
}
