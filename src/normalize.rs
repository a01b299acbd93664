//! Input normalization and the structural format check.
//!
//! # Example
//!
//! ```
//! use bincheck::normalize::{check_format, normalize};
//!
//! let normalized = normalize(" 4111-1111 1111-1111 ");
//! assert_eq!(normalized, "4111111111111111");
//!
//! let number = check_format(&normalized).unwrap();
//! assert_eq!(number.length(), 16);
//! assert_eq!(number.bin_prefix().as_str(), "411111");
//! ```

use crate::error::FormatError;
use crate::number::{NormalizedNumber, MAX_DIGITS, MIN_DIGITS};

/// Removes whitespace and hyphens; everything else is kept as-is.
///
/// Never fails, including on empty input.
#[inline]
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Checks that a normalized string is 12 to 19 ASCII digits.
pub fn check_format(normalized: &str) -> Result<NormalizedNumber, FormatError> {
    if normalized.is_empty() {
        return Err(FormatError::Empty);
    }

    if let Some((position, character)) = normalized
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(FormatError::InvalidCharacter {
            position,
            character,
        });
    }

    // All ASCII from here, so byte length is digit count.
    let count = normalized.len();
    if count < MIN_DIGITS {
        return Err(FormatError::TooShort {
            length: count,
            minimum: MIN_DIGITS,
        });
    }
    if count > MAX_DIGITS {
        return Err(FormatError::TooLong {
            length: count,
            maximum: MAX_DIGITS,
        });
    }

    let mut digits = [0u8; MAX_DIGITS];
    for (slot, b) in digits.iter_mut().zip(normalized.bytes()) {
        *slot = b - b'0';
    }

    Ok(NormalizedNumber::new(digits, count as u8))
}

/// Normalizes and format-checks in one step.
#[inline]
pub fn parse(raw: &str) -> Result<NormalizedNumber, FormatError> {
    check_format(&normalize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize("4111-1111-1111-1111"), "4111111111111111");
        assert_eq!(normalize("4111 1111\t1111\n1111"), "4111111111111111");
        assert_eq!(normalize("  4111--1111  "), "41111111");
    }

    #[test]
    fn test_normalize_keeps_other_characters() {
        assert_eq!(normalize("abc DEF"), "abcDEF");
        assert_eq!(normalize("4111.1111"), "4111.1111");
        assert_eq!(normalize("4111_1111"), "4111_1111");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" - - "), "");
    }

    #[test]
    fn test_check_format_accepts_bounds() {
        assert_eq!(check_format("123456789012").unwrap().length(), 12);
        assert_eq!(check_format("1234567890123456789").unwrap().length(), 19);
    }

    #[test]
    fn test_check_format_rejects_length() {
        assert_eq!(
            check_format("12345678901").unwrap_err(),
            FormatError::TooShort {
                length: 11,
                minimum: 12
            }
        );
        assert_eq!(
            check_format("12345678901234567890").unwrap_err(),
            FormatError::TooLong {
                length: 20,
                maximum: 19
            }
        );
    }

    #[test]
    fn test_check_format_rejects_non_digits() {
        assert_eq!(
            check_format("abc").unwrap_err(),
            FormatError::InvalidCharacter {
                position: 0,
                character: 'a'
            }
        );
        assert_eq!(
            check_format("411111111111111X").unwrap_err(),
            FormatError::InvalidCharacter {
                position: 15,
                character: 'X'
            }
        );
        assert!(check_format("４１１１１１１１１１１１").is_err());
    }

    #[test]
    fn test_check_format_empty() {
        assert_eq!(check_format("").unwrap_err(), FormatError::Empty);
    }

    #[test]
    fn test_parse() {
        let number = parse("4111 1111 1111 1111").unwrap();
        assert_eq!(number.digits()[0], 4);
        assert!(parse("4111 1111").is_err());
    }
}
