//! Luhn checksum.
//!
//! The Luhn algorithm (also known as the "modulus 10" algorithm) is a checksum
//! formula used to validate card numbers and other identification numbers.
//!
//! Two entry points: `validate` works on digit values (0-9), and
//! `validate_str` works on text and reports the first non-digit instead of
//! treating it as zero. A value above 9 (for example an ASCII byte such as
//! `b'4'`) is never valid and never panics.

use crate::error::InvalidDigitError;

/// Lookup table for doubled digits: double the value, subtract 9 if >= 10.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates digit values (0-9) using the Luhn algorithm.
///
/// # Algorithm
///
/// 1. Starting from the rightmost digit (check digit), moving left
/// 2. Double every second digit
/// 3. If doubling results in a number > 9, subtract 9
/// 4. Sum all digits
/// 5. If the sum is divisible by 10, the number is valid
///
/// An empty slice, or one holding a value above 9, is never valid.
///
/// # Example
///
/// ```
/// use bincheck::luhn::validate;
///
/// let digits = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert!(validate(&digits));
///
/// let invalid = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2];
/// assert!(!validate(&invalid));
///
/// // ASCII bytes are not digit values.
/// assert!(!validate(b"4111111111111111"));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }

    matches!(compute_checksum(digits), Some(sum) if sum % 10 == 0)
}

/// Validates a string of decimal digits.
///
/// Any character other than `0`-`9` is an error, so a caller can always tell
/// "bad checksum" apart from "not a number".
///
/// # Example
///
/// ```
/// use bincheck::luhn::validate_str;
///
/// assert_eq!(validate_str("4111111111111111"), Ok(true));
/// assert_eq!(validate_str("4111111111111112"), Ok(false));
/// assert!(validate_str("4111-1111").is_err());
/// ```
pub fn validate_str(input: &str) -> Result<bool, InvalidDigitError> {
    let mut sum: u32 = 0;
    let mut count = 0usize;

    for (i, c) in input.chars().rev().enumerate() {
        let digit = c.to_digit(10).ok_or_else(|| InvalidDigitError {
            position: input.chars().count() - 1 - i,
            character: c,
        })? as u8;

        sum += weigh(digit, i % 2 == 1).unwrap_or(0);
        count += 1;
    }

    Ok(count > 0 && sum % 10 == 0)
}

/// Value a digit contributes to the sum, or `None` if it is not 0-9.
#[inline]
fn weigh(digit: u8, doubled: bool) -> Option<u32> {
    if doubled {
        DOUBLE_TABLE.get(digit as usize).map(|&d| d as u32)
    } else if digit <= 9 {
        Some(digit as u32)
    } else {
        None
    }
}

/// Computes the Luhn sum (not reduced modulo 10).
///
/// Returns `None` if any value is above 9.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> Option<u32> {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| weigh(digit, i % 2 == 1))
        .sum()
}

/// Computes the check digit that makes `digits` followed by it pass.
///
/// Returns `None` if any value is above 9.
///
/// # Example
///
/// ```
/// use bincheck::luhn::generate_check_digit;
///
/// let partial = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert_eq!(generate_check_digit(&partial), Some(1));
/// assert_eq!(generate_check_digit(b"411111"), None);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> Option<u8> {
    // Every existing digit shifts one place left once the check digit is
    // appended, so the doubling parity flips.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| weigh(digit, i % 2 == 0))
        .sum::<Option<u32>>()?;

    Some(((10 - (sum % 10)) % 10) as u8)
}
