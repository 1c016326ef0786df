//! Bit-stuffing.
//!
//! After every run of five consecutive `1` bits the sender inserts a `0`.
//! The frame flag `01111110` holds six consecutive `1` bits, so a stuffed
//! payload can never contain it.

use crate::bits::{BitString, Symbol};
use crate::error::{CoreError, CoreResult};

/// Longest run of set bits allowed in stuffed output before a `0` is forced.
pub const MAX_RUN: usize = 5;

/// Inserts a `0` after every run of five consecutive `1` bits.
pub fn stuff(bits: &BitString) -> BitString {
    BitString::from(stuff_symbols(bits.as_slice()))
}

/// Removes the `0` bits inserted by [`stuff`].
///
/// # Errors
///
/// Returns [`CoreError::Stuffing`] when five consecutive `1` bits are
/// followed by another `1` or by the end of input.
pub fn unstuff(bits: &BitString) -> CoreResult<BitString> {
    unstuff_symbols(bits.as_slice()).map(BitString::from)
}

/// Stuffing over any [`Symbol`].
///
/// A symbol that is neither set nor unset resets the run and is copied as is.
pub fn stuff_symbols<S: Symbol>(symbols: &[S]) -> Vec<S> {
    let mut out = Vec::with_capacity(symbols.len() + symbols.len() / MAX_RUN);
    let mut run = 0;

    for &symbol in symbols {
        out.push(symbol);
        if symbol.is_set() {
            run += 1;
            if run == MAX_RUN {
                out.push(S::UNSET);
                run = 0;
            }
        } else {
            run = 0;
        }
    }

    out
}

/// Unstuffing over any [`Symbol`].
pub fn unstuff_symbols<S: Symbol>(symbols: &[S]) -> CoreResult<Vec<S>> {
    let mut out = Vec::with_capacity(symbols.len());
    let mut run = 0;
    let mut iter = symbols.iter().copied().enumerate();

    while let Some((_, symbol)) = iter.next() {
        out.push(symbol);
        if !symbol.is_set() {
            run = 0;
            continue;
        }

        run += 1;
        if run == MAX_RUN {
            match iter.next() {
                Some((_, next)) if next.is_unset() => run = 0,
                Some((position, _)) => return Err(CoreError::Stuffing { position }),
                None => {
                    return Err(CoreError::Stuffing {
                        position: symbols.len(),
                    });
                }
            }
        }
    }

    Ok(out)
}

/// Returns the longest run of consecutive set symbols.
pub fn longest_run<S: Symbol>(symbols: &[S]) -> usize {
    symbols
        .split(|symbol| !symbol.is_set())
        .map(<[S]>::len)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    /// Every bit string of the given length, in counting order.
    fn all_bit_strings(len: usize) -> impl Iterator<Item = BitString> {
        (0u32..1 << len).map(move |n| {
            BitString::from((0..len).rev().map(|i| (n >> i) & 1 == 1).collect::<Vec<_>>())
        })
    }

    #[test]
    fn stuff_without_long_runs_is_identity() {
        assert_eq!(stuff(&bits("01000001")), bits("01000001"));
        assert_eq!(stuff(&bits("11110111101111")), bits("11110111101111"));
    }

    #[test]
    fn stuff_inserts_zero_after_five_ones() {
        assert_eq!(stuff(&bits("11111")), bits("111110"));
        assert_eq!(stuff(&bits("111111")), bits("1111101"));
        assert_eq!(stuff(&bits("0111110")), bits("01111100"));
    }

    #[test]
    fn stuff_literal_bit_message() {
        let stuffed = stuff(&bits("1111101111111111"));
        assert_eq!(stuffed, bits("1111100111110111110"));
        assert_eq!(unstuff(&stuffed).unwrap(), bits("1111101111111111"));
    }

    #[test]
    fn stuff_empty() {
        assert!(stuff(&BitString::new()).is_empty());
        assert!(unstuff(&BitString::new()).unwrap().is_empty());
    }

    #[test]
    fn unstuff_inverts_stuff_exhaustively() {
        for len in 0..=14 {
            for original in all_bit_strings(len) {
                let stuffed = stuff(&original);
                assert!(stuffed.len() >= original.len());
                assert_eq!(unstuff(&stuffed).unwrap(), original, "len {len}");
            }
        }
    }

    #[test]
    fn stuffed_output_never_holds_six_ones() {
        for len in 0..=14 {
            for original in all_bit_strings(len) {
                let stuffed = stuff(&original);
                assert!(longest_run(stuffed.as_slice()) <= MAX_RUN, "{stuffed}");
            }
        }
    }

    #[test]
    fn unstuff_rejects_six_ones() {
        let err = unstuff(&bits("0111111")).unwrap_err();
        assert_eq!(err, CoreError::Stuffing { position: 6 });
    }

    #[test]
    fn unstuff_rejects_missing_stuffed_bit() {
        let err = unstuff(&bits("0011111")).unwrap_err();
        assert_eq!(err, CoreError::Stuffing { position: 7 });
    }

    #[test]
    fn wire_symbols_stuff_like_bits() {
        let original = bits("0111111111100");
        let stuffed = stuff(&original);
        assert_eq!(stuff_symbols(&original.to_wire()), stuffed.to_wire());
        assert_eq!(
            unstuff_symbols(&stuffed.to_wire()).unwrap(),
            original.to_wire()
        );
    }

    #[test]
    fn unknown_wire_symbol_resets_run() {
        assert_eq!(unstuff_symbols(b"1111x11").unwrap(), b"1111x11".to_vec());
        assert!(unstuff_symbols(b"11111x").is_err());
    }

    #[test]
    fn longest_run_counts_set_bits() {
        assert_eq!(longest_run(bits("").as_slice()), 0);
        assert_eq!(longest_run(bits("0110111").as_slice()), 3);
        assert_eq!(longest_run(&b"01111110"[..]), 6);
    }
}
