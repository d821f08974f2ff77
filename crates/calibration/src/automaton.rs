//! Table of folded states recognizing spelled-out digits.

#[cfg(test)]
mod tests;

use core::fmt;
use std::sync::OnceLock;

use arrayvec::ArrayVec;
use bstr::BString;

use crate::error::AutomatonError;
use crate::pair::fold;

/// Maximum number of states an automaton can hold.
pub const CAPACITY: usize = 64;

/// The spelled-out digits and their values.
pub const DIGIT_WORDS: [(&[u8], u8); 10] = [
    (b"zero", 0),
    (b"one", 1),
    (b"two", 2),
    (b"three", 3),
    (b"four", 4),
    (b"five", 5),
    (b"six", 6),
    (b"seven", 7),
    (b"eight", 8),
    (b"nine", 9),
];

/// The marker associated with a folded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// A prefix of at least one word.
    Partial,
    /// A complete word with the given value.
    Digit(u8),
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Partial => write!(f, "partial"),
            State::Digit(d) => write!(f, "digit {d}"),
        }
    }
}

/// An immutable mapping from folded accumulator to [State].
///
/// Entries are kept sorted by state so lookups are a binary search.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: ArrayVec<(u32, State), CAPACITY>,
}

impl Automaton {
    /// Build the automaton for [DIGIT_WORDS].
    ///
    /// # Examples
    ///
    /// ```
    /// use calibration::{fold, Automaton, State};
    ///
    /// let automaton = Automaton::new()?;
    ///
    /// let mut acc = 0;
    ///
    /// for b in *b"thre" {
    ///     acc = fold(acc, b).unwrap();
    ///     assert_eq!(automaton.get(acc), Some(State::Partial));
    /// }
    ///
    /// acc = fold(acc, b'e').unwrap();
    /// assert_eq!(automaton.get(acc), Some(State::Digit(3)));
    /// # Ok::<_, calibration::AutomatonError>(())
    /// ```
    pub fn new() -> Result<Self, AutomatonError> {
        Self::from_words(&DIGIT_WORDS)
    }

    /// Build an automaton out of the given words and their values.
    pub fn from_words(words: &[(&[u8], u8)]) -> Result<Self, AutomatonError> {
        let mut this = Self {
            states: ArrayVec::new(),
        };

        for (index, &(word, value)) in words.iter().enumerate() {
            let Some(last) = word.len().checked_sub(1) else {
                return Err(AutomatonError::EmptyWord { index });
            };

            if value > 9 {
                return Err(AutomatonError::BadDigit {
                    word: BString::from(word),
                    value,
                });
            }

            let mut acc = 0u32;

            for (n, &b) in word.iter().enumerate() {
                let Some(next) = fold(acc, b) else {
                    return Err(AutomatonError::Overflow {
                        word: BString::from(word),
                    });
                };

                acc = next;

                let state = if n == last {
                    State::Digit(value)
                } else {
                    State::Partial
                };

                this.insert(word, acc, state)?;
            }
        }

        log::debug!("built automaton with {} states", this.states.len());
        Ok(this)
    }

    /// Access the process-wide automaton for [DIGIT_WORDS], building it on
    /// first use.
    pub fn global() -> Result<&'static Automaton, AutomatonError> {
        static GLOBAL: OnceLock<Result<Automaton, AutomatonError>> = OnceLock::new();
        GLOBAL.get_or_init(Automaton::new).as_ref().map_err(Clone::clone)
    }

    /// Look up the marker for a folded accumulator.
    #[inline]
    pub fn get(&self, acc: u32) -> Option<State> {
        let index = self.states.binary_search_by_key(&acc, |&(s, _)| s).ok()?;
        Some(self.states[index].1)
    }

    /// Number of states in the automaton.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Test if the automaton has no states.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate over all states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, State)> + '_ {
        self.states.iter().copied()
    }

    fn insert(&mut self, word: &[u8], acc: u32, state: State) -> Result<(), AutomatonError> {
        match self.states.binary_search_by_key(&acc, |&(s, _)| s) {
            Ok(index) => {
                let existing = self.states[index].1;

                if existing != state {
                    return Err(AutomatonError::Conflict {
                        word: BString::from(word),
                        state: acc,
                        existing,
                        new: state,
                    });
                }

                Ok(())
            }
            Err(index) => {
                if self.states.try_insert(index, (acc, state)).is_err() {
                    return Err(AutomatonError::Capacity(CAPACITY));
                }

                Ok(())
            }
        }
    }
}
