//! # bincheck
//!
//! Card number checking with BIN directory enrichment.
//!
//! For each candidate number: strip separators, check it is 12-19 digits,
//! run the Luhn checksum, look up issuer metadata for the first six digits,
//! and report a masked, human-readable verdict. Batches are processed in
//! order with a pause between candidates so the public directory is never
//! hit in a burst.
//!
//! A passing result means the checksum is right and the directory knows the
//! prefix. It says nothing about whether the card exists or can be charged.
//!
//! ## Quick Start
//!
//! ```rust
//! use bincheck::{luhn, mask, normalize};
//!
//! let normalized = normalize::normalize("4111-1111-1111-1111");
//! assert_eq!(normalized, "4111111111111111");
//! assert_eq!(luhn::validate_str(&normalized), Ok(true));
//! assert_eq!(mask::mask(&normalized), "411111******1111");
//! ```
//!
//! ## Batch Checking
//!
//! ```rust,no_run
//! use bincheck::directory::BinlistClient;
//! use bincheck::BatchChecker;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let checker = BatchChecker::new(BinlistClient::new()?);
//! let response = checker
//!     .check_all(&["4111 1111 1111 1111", "5500-0000-0000-0004"])
//!     .await?;
//!
//! for result in response.results() {
//!     println!("{}: {}", result.masked(), result.summary());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Lookup Outcomes
//!
//! | Directory answer | Result |
//! |------------------|--------|
//! | 2xx | metadata attached |
//! | 404 | no metadata, `lookup = "no metadata available"` |
//! | 429 | no metadata, `lookup = "rate limited"` |
//! | other status | no metadata, `lookup = "status N"` |
//! | timeout / network | no metadata, `lookup = "lookup failed: ..."` |
//!
//! None of these fail the batch, and none are retried.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |
//!
//! ## Security
//!
//! - Normalized numbers are stored in fixed-size arrays zeroed on drop
//! - `Debug` and `Display` show masked numbers only
//! - Results carry the masked number and the six-digit prefix, never the full number
//! - Logs carry the same masked form
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod directory;
pub mod error;
pub mod luhn;
pub mod mask;
pub mod normalize;
pub mod number;
pub mod report;

// Re-export main types at crate root
pub use batch::{BatchChecker, CheckerConfig};
pub use directory::{BinDirectory, BinMetadata, LookupOutcome};
pub use error::{FormatError, InvalidDigitError, RequestError};
pub use number::{BinPrefix, NormalizedNumber, BIN_LENGTH, MAX_DIGITS, MIN_DIGITS};
pub use report::{BatchResponse, ValidationResult};
