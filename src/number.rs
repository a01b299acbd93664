//! Card number types that have passed the format check.
//!
//! `NormalizedNumber` keeps its digits in a fixed-size array that is zeroed on
//! drop, and its `Debug`/`Display` output is always masked. `BinPrefix` is the
//! six-digit directory lookup key.

use std::fmt;
use zeroize::Zeroize;

/// Maximum number of digits accepted after normalization.
pub const MAX_DIGITS: usize = 19;

/// Minimum number of digits accepted after normalization.
pub const MIN_DIGITS: usize = 12;

/// Number of leading digits used as the directory lookup key.
pub const BIN_LENGTH: usize = 6;

/// A digit-only card number of 12 to 19 digits.
///
/// Only `normalize::check_format` creates these, so every instance satisfies
/// the length and digit invariants.
///
/// # Security
///
/// - Digits are private; the full number is reachable only through
///   `digits()` and `to_digit_string()`
/// - Memory is zeroed on drop
/// - Debug and Display are masked
#[derive(Clone)]
pub struct NormalizedNumber {
    /// Digit values (0-9), not ASCII.
    digits: [u8; MAX_DIGITS],
    digit_count: u8,
}

impl NormalizedNumber {
    #[inline]
    pub(crate) fn new(digits: [u8; MAX_DIGITS], digit_count: u8) -> Self {
        Self {
            digits,
            digit_count,
        }
    }

    /// Number of digits.
    #[inline]
    pub const fn length(&self) -> usize {
        self.digit_count as usize
    }

    /// Digit values (0-9) in order.
    ///
    /// # Security Warning
    ///
    /// This exposes the full card number. Prefer `masked()` for display.
    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.digit_count as usize]
    }

    /// The six-digit lookup key.
    #[inline]
    pub fn bin_prefix(&self) -> BinPrefix {
        let mut prefix = [0u8; BIN_LENGTH];
        for (slot, &d) in prefix.iter_mut().zip(&self.digits[..BIN_LENGTH]) {
            *slot = b'0' + d;
        }
        BinPrefix(prefix)
    }

    /// The number as a digit string.
    ///
    /// # Security Warning
    ///
    /// Never log or return the result. Use `masked()` for anything
    /// leaving the process.
    pub(crate) fn to_digit_string(&self) -> String {
        self.digits()
            .iter()
            .map(|&d| (b'0' + d) as char)
            .collect()
    }

    /// The number masked for display: `411111******1111`.
    #[inline]
    pub fn masked(&self) -> String {
        let mut plain = self.to_digit_string();
        let masked = crate::mask::mask(&plain);
        plain.zeroize();
        masked
    }
}

impl fmt::Debug for NormalizedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedNumber")
            .field("number", &self.masked())
            .field("length", &self.digit_count)
            .finish()
    }
}

impl fmt::Display for NormalizedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl Drop for NormalizedNumber {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

/// The first six digits of a card number, used as the directory key.
///
/// Always exactly six ASCII digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinPrefix([u8; BIN_LENGTH]);

impl BinPrefix {
    /// Parses a prefix, returning `None` unless `s` is exactly six ASCII digits.
    ///
    /// # Example
    ///
    /// ```
    /// use bincheck::BinPrefix;
    ///
    /// assert_eq!(BinPrefix::parse("411111").unwrap().as_str(), "411111");
    /// assert!(BinPrefix::parse("41111").is_none());
    /// assert!(BinPrefix::parse("41111a").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != BIN_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let mut prefix = [0u8; BIN_LENGTH];
        prefix.copy_from_slice(bytes);
        Some(Self(prefix))
    }

    /// The prefix as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Constructors only admit ASCII digits.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// The prefix as an integer, for range comparisons.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
            .iter()
            .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'))
    }
}

impl fmt::Debug for BinPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinPrefix({})", self.as_str())
    }
}

impl fmt::Display for BinPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for BinPrefix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_number(digits_slice: &[u8]) -> NormalizedNumber {
        let mut digits = [0u8; MAX_DIGITS];
        digits[..digits_slice.len()].copy_from_slice(digits_slice);
        NormalizedNumber::new(digits, digits_slice.len() as u8)
    }

    #[test]
    fn test_bin_prefix_from_number() {
        let number = make_number(&[4, 5, 3, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
        let prefix = number.bin_prefix();
        assert_eq!(prefix.as_str(), "453211");
        assert_eq!(prefix.value(), 453211);
    }

    #[test]
    fn test_bin_prefix_parse() {
        assert!(BinPrefix::parse("000000").is_some());
        assert!(BinPrefix::parse("").is_none());
        assert!(BinPrefix::parse("4111111").is_none());
        assert!(BinPrefix::parse("4111 1").is_none());
        assert!(BinPrefix::parse("４１１１１１").is_none());
    }

    #[test]
    fn test_debug_is_masked() {
        let number = make_number(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
        let debug = format!("{:?}", number);
        assert!(!debug.contains("4111111111111111"));
        assert!(debug.contains("411111******1111"));
        assert_eq!(number.to_string(), "411111******1111");
    }

    #[test]
    fn test_digit_string() {
        let number = make_number(&[5, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4]);
        assert_eq!(number.to_digit_string(), "5500000000000004");
        assert_eq!(number.length(), 16);
    }

    #[test]
    fn test_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NormalizedNumber>();
        assert_send_sync::<BinPrefix>();
    }
}
