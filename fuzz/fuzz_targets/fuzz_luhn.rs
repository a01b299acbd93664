//! Fuzz target for Luhn algorithm.
//!
//! Tests that luhn functions never panic and maintain invariants.

#![no_main]

use bincheck::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Clamp values to valid digit range
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();

    let byte_result = luhn::validate(&digits);

    // The string form must agree with the byte form
    let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    assert_eq!(luhn::validate_str(&text), Ok(byte_result), "string/byte mismatch");

    // Arbitrary text never panics
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = luhn::validate_str(s);
    }

    // Raw bytes never panic either
    let _ = luhn::validate(data);
    let _ = luhn::compute_checksum(data);
    let _ = luhn::generate_check_digit(data);

    // Check digit generation
    if !digits.is_empty() && digits.len() <= 18 {
        let check = luhn::generate_check_digit(&digits).unwrap();
        assert!(check <= 9, "Check digit should be 0-9");

        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::validate(&with_check), "Adding check digit should make valid");
    }
});
