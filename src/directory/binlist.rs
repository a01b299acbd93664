//! Client for the public binlist.net lookup service.
//!
//! One `GET {base_url}/{prefix}` per lookup, with a bounded timeout and no
//! retries. The service is free and unreliable: 404, 429, other statuses,
//! timeouts and connection failures are all expected, and all of them come
//! back as `LookupOutcome` values.

use super::{BinDirectory, BinMetadata, FailureKind, LookupOutcome};
use crate::error::DirectoryError;
use crate::number::BinPrefix;
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Public binlist.net endpoint.
pub const DEFAULT_BASE_URL: &str = "https://lookup.binlist.net";

/// Upper bound on a single lookup, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for `BinlistClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinlistConfig {
    /// Service root; the prefix is appended as the last path segment.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for BinlistConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("bincheck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl BinlistConfig {
    /// Builder method to set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder method to set the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-backed BIN directory.
#[derive(Debug, Clone)]
pub struct BinlistClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BinlistClient {
    /// Creates a client for the public service with default settings.
    pub fn new() -> Result<Self, DirectoryError> {
        Self::with_config(BinlistConfig::default())
    }

    /// Creates a client from explicit settings.
    pub fn with_config(config: BinlistConfig) -> Result<Self, DirectoryError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| DirectoryError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::InvalidUrl(config.base_url));
        }
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { http, base_url })
    }

    fn url_for(&self, prefix: &BinPrefix) -> Option<Url> {
        self.base_url.join(prefix.as_str()).ok()
    }
}

impl BinDirectory for BinlistClient {
    async fn lookup(&self, prefix: &BinPrefix) -> LookupOutcome {
        let Some(url) = self.url_for(prefix) else {
            return LookupOutcome::InvalidPrefix;
        };

        let response = match self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let kind = failure_kind(&err);
                warn!(bin = %prefix, error = %err, "BIN lookup failed: {}", kind);
                return LookupOutcome::Failed(kind);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let outcome = match status {
                StatusCode::NOT_FOUND => LookupOutcome::NotFound,
                StatusCode::TOO_MANY_REQUESTS => LookupOutcome::RateLimited,
                other => LookupOutcome::BadStatus(other.as_u16()),
            };
            if status == StatusCode::NOT_FOUND {
                debug!(bin = %prefix, "BIN not in directory");
            } else {
                warn!(bin = %prefix, status = status.as_u16(), "BIN lookup refused");
            }
            return outcome;
        }

        match response.json::<BinlistRecord>().await {
            Ok(record) => {
                debug!(bin = %prefix, "BIN lookup succeeded");
                LookupOutcome::Found(record.into())
            }
            Err(err) => {
                let kind = if err.is_timeout() {
                    FailureKind::Timeout
                } else {
                    FailureKind::Decode
                };
                warn!(bin = %prefix, error = %err, "BIN lookup body unreadable");
                LookupOutcome::Failed(kind)
            }
        }
    }
}

fn failure_kind(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    }
}

/// binlist.net response body. Only the fields we surface are read.
#[derive(Debug, Default, Deserialize)]
struct BinlistRecord {
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default, rename = "type")]
    card_type: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    prepaid: Option<bool>,
    #[serde(default)]
    country: Option<BinlistCountry>,
    #[serde(default)]
    bank: Option<BinlistBank>,
}

#[derive(Debug, Default, Deserialize)]
struct BinlistCountry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    alpha2: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BinlistBank {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl From<BinlistRecord> for BinMetadata {
    fn from(record: BinlistRecord) -> Self {
        let country = record.country.unwrap_or_default();
        let bank = record.bank.unwrap_or_default();
        Self {
            scheme: record.scheme,
            card_type: record.card_type,
            brand: record.brand,
            prepaid: record.prepaid,
            bank_name: bank.name,
            bank_url: bank.url,
            bank_phone: bank.phone,
            country_name: country.name,
            country_code: country.alpha2,
        }
    }
}
