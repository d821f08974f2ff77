use std::collections::HashMap;

use bstr::BString;

use super::{Automaton, State, DIGIT_WORDS};
use crate::error::AutomatonError;
use crate::pair::fold;

/// Map every state of the digit automaton back to the prefix it encodes.
fn prefixes() -> HashMap<u32, Vec<u8>> {
    let mut prefixes = HashMap::new();

    for (word, _) in DIGIT_WORDS {
        let mut acc = 0;

        for (n, &b) in word.iter().enumerate() {
            acc = fold(acc, b).unwrap();
            prefixes.insert(acc, word[..=n].to_vec());
        }
    }

    prefixes
}

fn transition(from: &str, b: u8, to: &str) -> (BString, u8, BString) {
    (BString::from(from), b, BString::from(to))
}

#[test]
fn test_digit_words_fold_to_their_value() {
    let automaton = Automaton::new().unwrap();

    for (word, value) in DIGIT_WORDS {
        let mut acc = 0;

        for (n, &b) in word.iter().enumerate() {
            acc = fold(acc, b).unwrap();

            let expected = if n + 1 == word.len() {
                State::Digit(value)
            } else {
                State::Partial
            };

            assert_eq!(automaton.get(acc), Some(expected), "{:?} at {n}", bstr::BStr::new(word));
        }
    }
}

#[test]
fn test_shared_prefixes_are_deduplicated() {
    let automaton = Automaton::new().unwrap();
    // t/two/three, f/four/five, s/six/seven share their leading bytes.
    assert_eq!(automaton.len(), 37);
    let states = automaton.iter().map(|(s, _)| s).collect::<Vec<_>>();
    assert!(states.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_unknown_states() {
    let automaton = Automaton::new().unwrap();
    assert_eq!(automaton.get(0), None);
    assert_eq!(automaton.get(b'1' as u32), None);
    assert_eq!(automaton.get(b'x' as u32), None);
    assert_eq!(automaton.get(fold(b'o' as u32, b'o').unwrap()), None);
    assert_eq!(automaton.get(b'o' as u32), Some(State::Partial));
}

#[test]
fn test_global() {
    let a = Automaton::global().unwrap();
    let b = Automaton::global().unwrap();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a.len(), Automaton::new().unwrap().len());
}

#[test]
fn test_prefix_conflict() {
    let error = Automaton::from_words(&[(b"on", 1), (b"one", 1)]).unwrap_err();

    assert!(matches!(
        error,
        AutomatonError::Conflict {
            existing: State::Digit(1),
            new: State::Partial,
            ..
        }
    ));

    let error = Automaton::from_words(&[(b"one", 1), (b"on", 2)]).unwrap_err();

    assert!(matches!(
        error,
        AutomatonError::Conflict {
            existing: State::Partial,
            new: State::Digit(2),
            ..
        }
    ));
}

#[test]
fn test_duplicate_words() {
    assert!(Automaton::from_words(&[(b"one", 1), (b"one", 1)]).is_ok());

    let error = Automaton::from_words(&[(b"one", 1), (b"one", 2)]).unwrap_err();
    assert!(matches!(error, AutomatonError::Conflict { .. }));
}

#[test]
fn test_bad_words() {
    assert_eq!(
        Automaton::from_words(&[(b"one", 1), (b"", 2)]).unwrap_err(),
        AutomatonError::EmptyWord { index: 1 }
    );

    assert!(matches!(
        Automaton::from_words(&[(b"ten", 10)]).unwrap_err(),
        AutomatonError::BadDigit { value: 10, .. }
    ));
}

#[test]
fn test_capacity() {
    let words = (0..=super::CAPACITY as u8)
        .map(|n| [b'a' + n % 26, b'A' + n / 26])
        .collect::<Vec<_>>();

    let words = words
        .iter()
        .map(|w| (&w[..], 1u8))
        .collect::<Vec<_>>();

    assert_eq!(
        Automaton::from_words(&words).unwrap_err(),
        AutomatonError::Capacity(super::CAPACITY)
    );
}

#[test]
fn test_false_transitions() {
    let automaton = Automaton::new().unwrap();
    let prefixes = prefixes();
    assert_eq!(prefixes.len(), automaton.len());

    let mut nul = 0;
    let mut other = Vec::new();

    // Every state a scan can be in is a table state, so this covers all
    // transitions reachable over 7-bit input.
    for (&state, prefix) in &prefixes {
        for b in 0..=127u8 {
            let Some(next) = fold(state, b) else {
                continue;
            };

            let Some(target) = automaton.get(next).and(prefixes.get(&next)) else {
                continue;
            };

            let mut expected = prefix.clone();
            expected.push(b);

            if *target == expected {
                continue;
            }

            if b == 0 {
                assert_eq!(target, prefix);
                nul += 1;
                continue;
            }

            other.push((BString::from(&prefix[..]), b, BString::from(&target[..])));
        }
    }

    other.sort();

    // A zero byte never moves the accumulator.
    assert_eq!(nul, automaton.len());

    assert_eq!(
        other,
        [
            transition("e", 0x01, "f"),
            transition("e", 0x03, "n"),
            transition("f", 0x03, "o"),
            transition("fi", 0x17, "si"),
            transition("fi", b'(', "on"),
            transition("n", 0x01, "o"),
            transition("o", 0x02, "s"),
            transition("one", b'<', "two"),
            transition("s", 0x01, "t"),
        ]
    );
}
