//! Fuzz target for masking.
//!
//! Tests that masking never panics, keeps length, and hides the middle.

#![no_main]

use bincheck::mask::{mask, MASK_CHAR};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let masked = mask(data);
    let len = data.chars().count();
    assert_eq!(masked.chars().count(), len, "length must be preserved");

    let hidden = masked.chars().filter(|&c| c == MASK_CHAR).count();
    if len <= 6 {
        assert_eq!(hidden, len, "short input must be fully masked");
    } else {
        let visible = if len > 10 { 10 } else { 6 };
        assert!(hidden >= len - visible);
    }
});
