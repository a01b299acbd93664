//! BIN (Bank Identification Number) directory lookups.
//!
//! A directory maps a six-digit prefix to issuer metadata. Lookups never
//! fail with an error: every outcome (not found, rate limited, timeout, ...)
//! is a `LookupOutcome` variant, and callers degrade to "no metadata".
//!
//! Implementations:
//!
//! - `BinlistClient` - the public binlist.net HTTP service
//! - `MemoryDirectory` - offline directory with exact prefixes and ranges
//! - `CachedDirectory` - explicitly scoped cache around any directory
//!
//! # Example
//!
//! ```
//! use bincheck::directory::{BinDirectory, BinMetadata, LookupOutcome, MemoryDirectory};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut directory = MemoryDirectory::new();
//! directory.insert("411111", BinMetadata::with_scheme("visa").bank_name("Test Bank"));
//!
//! match directory.lookup_str("411111").await {
//!     LookupOutcome::Found(info) => assert_eq!(info.bank_name.as_deref(), Some("Test Bank")),
//!     other => panic!("unexpected {:?}", other),
//! }
//! assert_eq!(directory.lookup_str("4111").await, LookupOutcome::InvalidPrefix);
//! # }
//! ```

mod binlist;
mod cache;
mod memory;

pub use binlist::{BinlistClient, BinlistConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use cache::{CacheConfig, CachedDirectory, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use memory::{BinRange, MemoryDirectory};

use crate::number::BinPrefix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Source of issuer metadata keyed by BIN prefix.
///
/// One call is one lookup: implementations must not retry.
pub trait BinDirectory: Send + Sync {
    /// Looks up metadata for a prefix.
    fn lookup(&self, prefix: &BinPrefix) -> impl Future<Output = LookupOutcome> + Send;

    /// Looks up metadata for a prefix given as text.
    ///
    /// Anything other than exactly six ASCII digits yields
    /// `LookupOutcome::InvalidPrefix` without calling `lookup`.
    fn lookup_str(&self, prefix: &str) -> impl Future<Output = LookupOutcome> + Send {
        let parsed = BinPrefix::parse(prefix);
        async move {
            match parsed {
                Some(prefix) => self.lookup(&prefix).await,
                None => LookupOutcome::InvalidPrefix,
            }
        }
    }
}

impl<D: BinDirectory> BinDirectory for &D {
    fn lookup(&self, prefix: &BinPrefix) -> impl Future<Output = LookupOutcome> + Send {
        (**self).lookup(prefix)
    }
}

impl<D: BinDirectory> BinDirectory for Arc<D> {
    fn lookup(&self, prefix: &BinPrefix) -> impl Future<Output = LookupOutcome> + Send {
        (**self).lookup(prefix)
    }
}

/// Issuer metadata for a BIN prefix.
///
/// Every field is optional; directories rarely know all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct BinMetadata {
    /// Card network, e.g. `visa`, `mastercard`.
    #[serde(default)]
    pub scheme: Option<String>,

    /// `debit` or `credit`.
    #[serde(default)]
    pub card_type: Option<String>,

    /// Product name, e.g. `Traditional`, `Platinum`.
    #[serde(default)]
    pub brand: Option<String>,

    /// Whether the card is prepaid.
    #[serde(default)]
    pub prepaid: Option<bool>,

    /// Name of the issuing bank.
    #[serde(default)]
    pub bank_name: Option<String>,

    /// Issuing bank's website.
    #[serde(default)]
    pub bank_url: Option<String>,

    /// Issuing bank's phone number.
    #[serde(default)]
    pub bank_phone: Option<String>,

    /// Full name of the issuing country.
    #[serde(default)]
    pub country_name: Option<String>,

    /// ISO 3166-1 alpha-2 code of the issuing country.
    #[serde(default)]
    pub country_code: Option<String>,
}

impl BinMetadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates metadata with only the scheme set.
    pub fn with_scheme(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            ..Default::default()
        }
    }

    /// Builder method to set the card type.
    pub fn card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    /// Builder method to set the brand.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Builder method to set the bank name.
    pub fn bank_name(mut self, name: impl Into<String>) -> Self {
        self.bank_name = Some(name.into());
        self
    }

    /// Builder method to set the country name.
    pub fn country_name(mut self, name: impl Into<String>) -> Self {
        self.country_name = Some(name.into());
        self
    }

    /// Builder method to set the country code.
    pub fn country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }
}

/// Why a lookup produced no answer at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request did not complete within the timeout.
    Timeout,
    /// Connection, DNS or TLS failure.
    Network,
    /// The directory answered 2xx with a body that could not be read.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Network => write!(f, "network error"),
            Self::Decode => write!(f, "invalid response"),
        }
    }
}

/// Result of one directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The directory knows this prefix.
    Found(BinMetadata),
    /// The directory has no entry for this prefix (HTTP 404).
    NotFound,
    /// The directory refused because of rate limiting (HTTP 429).
    RateLimited,
    /// Any other non-2xx status.
    BadStatus(u16),
    /// Timeout, transport or decoding failure.
    Failed(FailureKind),
    /// The prefix was not six digits; nothing was sent.
    InvalidPrefix,
}

impl LookupOutcome {
    /// Returns the metadata if the lookup succeeded.
    pub fn into_metadata(self) -> Option<BinMetadata> {
        match self {
            Self::Found(info) => Some(info),
            _ => None,
        }
    }

    /// Returns true for `Found`.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Short diagnostic for everything except `Found`.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Found(_) => None,
            Self::NotFound => Some("no metadata available".to_string()),
            Self::RateLimited => Some("rate limited".to_string()),
            Self::BadStatus(status) => Some(format!("status {}", status)),
            Self::Failed(kind) => Some(format!("lookup failed: {}", kind)),
            Self::InvalidPrefix => Some("invalid BIN prefix".to_string()),
        }
    }
}
