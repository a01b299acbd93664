//! Fuzz target for normalization and the format check.
//!
//! Tests that parsing never panics and only accepts 12-19 digits.

#![no_main]

use bincheck::normalize::{check_format, normalize};
use bincheck::{MAX_DIGITS, MIN_DIGITS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let normalized = normalize(data);
    assert_eq!(normalize(&normalized), normalized, "normalize should be idempotent");

    match check_format(&normalized) {
        Ok(number) => {
            assert!(number.length() >= MIN_DIGITS && number.length() <= MAX_DIGITS);
            assert_eq!(number.length(), normalized.len());
            assert_eq!(number.bin_prefix().as_str(), &normalized[..6]);
            // Display must never leak the full number
            assert_ne!(number.to_string(), normalized);
        }
        Err(err) => {
            assert_eq!(err.code(), "INVALID_FORMAT");
        }
    }
});
