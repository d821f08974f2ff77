//! Per-line digit extraction.


use crate::automaton::{Automaton, State};
use crate::pair::fold;

/// The first and last digit found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digits {
    pub first: u8,
    pub last: u8,
}

impl Digits {
    /// The two-digit number formed by the first and last digit.
    #[inline]
    pub fn value(&self) -> u32 {
        self.first as u32 * 10 + self.last as u32
    }
}

/// Scans lines for numerals and, if configured with an [Automaton], spelled
/// out digits.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    automaton: Option<&'a Automaton>,
}

impl<'a> Scanner<'a> {
    /// Construct a scanner recognizing numerals and the words in the given
    /// automaton.
    #[inline]
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton: Some(automaton),
        }
    }

    /// Construct a scanner which only recognizes numerals.
    #[inline]
    pub fn literal() -> Self {
        Self { automaton: None }
    }

    /// Scan a single line, returning `None` if it has no digits.
    ///
    /// Every start offset is tried on its own, so words sharing bytes are all
    /// recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use calibration::{Automaton, Digits, Scanner};
    ///
    /// let automaton = Automaton::new()?;
    /// let scanner = Scanner::new(&automaton);
    ///
    /// assert_eq!(scanner.scan(b"two1nine").map(|d| d.value()), Some(29));
    /// assert_eq!(scanner.scan(b"eighthree"), Some(Digits { first: 8, last: 3 }));
    /// assert_eq!(scanner.scan(b"abc"), None);
    ///
    /// let literal = Scanner::literal();
    /// assert_eq!(literal.scan(b"two1nine").map(|d| d.value()), Some(11));
    /// # Ok::<_, calibration::AutomatonError>(())
    /// ```
    pub fn scan(&self, line: &[u8]) -> Option<Digits> {
        let mut digits = None::<Digits>;

        let mut record = |d: u8| {
            digits.get_or_insert(Digits { first: d, last: d }).last = d;
        };

        let Some(automaton) = self.automaton else {
            for &b in line {
                if b.is_ascii_digit() {
                    record(b - b'0');
                }
            }

            return digits;
        };

        for i in 0..line.len() {
            let mut acc = 0;

            for &b in &line[i..] {
                if b.is_ascii_digit() {
                    record(b - b'0');
                }

                let Some(next) = fold(acc, b) else {
                    break;
                };

                acc = next;

                match automaton.get(acc) {
                    None => break,
                    Some(State::Partial) => {}
                    Some(State::Digit(d)) => record(d),
                }
            }
        }

        digits
    }
}
