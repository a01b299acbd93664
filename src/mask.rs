//! Masking for display and logging.
//!
//! The first six characters (the BIN) stay visible. The last four are shown
//! only when the input is longer than ten characters, so the visible prefix
//! and suffix never overlap. Inputs of six characters or fewer are masked
//! completely. Output length always equals input length.
//!
//! # Example
//!
//! ```
//! use bincheck::mask::mask;
//!
//! assert_eq!(mask("4111111111111111"), "411111******1111");
//! assert_eq!(mask("4111111111"), "411111****");
//! assert_eq!(mask("411111"), "******");
//! ```

/// Character used in place of hidden digits.
pub const MASK_CHAR: char = '*';

/// Leading characters left visible.
pub const VISIBLE_PREFIX: usize = 6;

/// Trailing characters left visible on inputs longer than ten.
pub const VISIBLE_SUFFIX: usize = 4;

/// Masks a string per the rules above. Length is counted in characters.
pub fn mask(input: &str) -> String {
    let len = input.chars().count();

    if len <= VISIBLE_PREFIX {
        return std::iter::repeat(MASK_CHAR).take(len).collect();
    }

    let suffix = if len > VISIBLE_PREFIX + VISIBLE_SUFFIX {
        VISIBLE_SUFFIX
    } else {
        0
    };
    let suffix_start = len - suffix;

    input
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i < VISIBLE_PREFIX || i >= suffix_start {
                c
            } else {
                MASK_CHAR
            }
        })
        .collect()
}
