//! Batch checking with paced directory lookups.
//!
//! Candidates are processed strictly one after another, in input order, with
//! a fixed pause between consecutive candidates so the external directory is
//! never hit in a burst. Lookups are never run in parallel.
//!
//! # Cancellation
//!
//! `check_all` returns nothing until every candidate is done. Dropping its
//! future (for example when the HTTP client disconnects and the server drops
//! the handler) stops the batch at the next await point: no further lookups
//! are started and the partial results are discarded.
//!
//! # Example
//!
//! ```
//! use bincheck::directory::{BinMetadata, MemoryDirectory};
//! use bincheck::{BatchChecker, CheckerConfig};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut directory = MemoryDirectory::new();
//! directory.insert("411111", BinMetadata::with_scheme("visa"));
//!
//! let checker = BatchChecker::with_config(
//!     directory,
//!     CheckerConfig::default().pacing(Duration::ZERO),
//! );
//! let response = checker
//!     .check_all(&["4111 1111 1111 1111", "not a card"])
//!     .await
//!     .unwrap();
//!
//! assert_eq!(response.count(), 2);
//! assert_eq!(response.results()[0].luhn(), Some(true));
//! assert_eq!(response.results()[1].luhn(), None);
//! # }
//! ```

use crate::directory::BinDirectory;
use crate::error::RequestError;
use crate::luhn;
use crate::mask::mask;
use crate::normalize::{check_format, normalize};
use crate::report::{BatchResponse, ValidationResult};
use std::time::Duration;
use tracing::{debug, info};
use zeroize::Zeroize;

/// Default cap on candidates per batch.
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// Default pause between consecutive candidates.
pub const DEFAULT_PACING: Duration = Duration::from_millis(80);

/// Batch limits and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Largest accepted batch.
    pub max_items: usize,
    /// Pause between consecutive candidates. Zero disables pacing.
    pub pacing: Duration,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            pacing: DEFAULT_PACING,
        }
    }
}

impl CheckerConfig {
    /// Builder method to set the batch cap.
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Builder method to set the pacing delay.
    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

/// Runs the normalize, format, Luhn, lookup and mask pipeline over batches.
///
/// Holds no per-request state; one checker can serve any number of
/// concurrent batches.
#[derive(Debug, Clone)]
pub struct BatchChecker<D> {
    directory: D,
    config: CheckerConfig,
}

impl<D: BinDirectory> BatchChecker<D> {
    /// Creates a checker with default limits and pacing.
    pub fn new(directory: D) -> Self {
        Self::with_config(directory, CheckerConfig::default())
    }

    /// Creates a checker with explicit limits and pacing.
    pub fn with_config(directory: D, config: CheckerConfig) -> Self {
        Self { directory, config }
    }

    /// The configured limits and pacing.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// The directory used for lookups.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Checks the request shape without doing any per-item work.
    pub fn validate_request<S>(&self, inputs: &[S]) -> Result<(), RequestError> {
        if inputs.is_empty() {
            return Err(RequestError::EmptyInput);
        }
        if inputs.len() > self.config.max_items {
            return Err(RequestError::TooManyItems {
                count: inputs.len(),
                maximum: self.config.max_items,
            });
        }
        Ok(())
    }

    /// Checks a single candidate.
    ///
    /// A lookup is made only if the candidate passes the format check, and
    /// it is made whether or not the checksum passes.
    pub async fn check(&self, raw: &str) -> ValidationResult {
        let mut normalized = normalize(raw);

        let result = match check_format(&normalized) {
            Ok(number) => {
                let luhn = luhn::validate(number.digits());
                let prefix = number.bin_prefix();
                debug!(masked = %number, luhn, "checking candidate");

                let outcome = self.directory.lookup(&prefix).await;
                ValidationResult::checked(&number, luhn, outcome)
            }
            Err(err) => {
                debug!(masked = %mask(&normalized), error = %err, "candidate rejected");
                ValidationResult::malformed(&normalized, &err)
            }
        };

        normalized.zeroize();
        result
    }

    /// Checks a batch in input order, pausing between candidates.
    ///
    /// Fails only on request-shape errors, before any candidate is touched.
    /// Format errors, checksum failures and lookup failures are all reported
    /// inside the per-candidate results.
    pub async fn check_all<S>(&self, inputs: &[S]) -> Result<BatchResponse, RequestError>
    where
        S: AsRef<str> + Sync,
    {
        self.validate_request(inputs)?;

        let mut results = Vec::with_capacity(inputs.len());
        for (index, raw) in inputs.iter().enumerate() {
            if index > 0 && !self.config.pacing.is_zero() {
                tokio::time::sleep(self.config.pacing).await;
            }
            results.push(self.check(raw.as_ref()).await);
        }

        let found = results.iter().filter(|r| r.bin_info().is_some()).count();
        info!(count = results.len(), with_metadata = found, "batch checked");

        Ok(BatchResponse::new(results))
    }
}
