//! Elegant pairing of two integers into one.


/// Pair two integers into a single integer.
///
/// This is not injective: `pair(x, 0) == pair(0, x) == x`, and the two
/// branches overlap (`pair(5, 1) == pair(2, 2)`). Distinct digit-word prefixes
/// still fold to distinct states, which is checked when an
/// [Automaton][crate::Automaton] is built. The output is computed in `u64` so
/// it never overflows for `u32` inputs.
///
/// # Examples
///
/// ```
/// use calibration::pair;
///
/// assert_eq!(pair(0, b'o' as u32), 111);
/// assert_eq!(pair(111, b'n' as u32), 110 * 110 + 111);
/// assert_eq!(pair(5, 3), 14);
/// assert_eq!(pair(3, 5), 17);
/// ```
#[inline]
pub const fn pair(x: u32, y: u32) -> u64 {
    let (x, y) = (x as u64, y as u64);

    if x >= y {
        y * y + x
    } else {
        x * x + x + y
    }
}

/// Fold a byte into an accumulator.
///
/// Returns `None` if the folded value does not fit in a `u32`, which means it
/// can't be a state in any table.
#[inline]
pub fn fold(acc: u32, b: u8) -> Option<u32> {
    u32::try_from(pair(acc, b as u32)).ok()
}
