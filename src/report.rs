//! Per-candidate results and the batch response.
//!
//! A `ValidationResult` never contains the full card number: the display
//! value is always masked and only the six-digit BIN prefix is kept.

use crate::directory::{BinMetadata, LookupOutcome};
use crate::error::FormatError;
use crate::mask::mask;
use crate::number::{BinPrefix, NormalizedNumber, MAX_DIGITS, MIN_DIGITS};
use serde::Serialize;

/// Disclaimer attached to every batch response.
pub const USAGE_NOTE: &str =
    "Use only legitimate numbers or test cards. Do not abuse the lookup service.";

/// Summary prefix for a passing checksum.
pub const LUHN_PASS: &str = "✅ Passes Luhn";

/// Summary prefix for a failing checksum.
pub const LUHN_FAIL: &str = "⚠️ Fails Luhn";

/// Separator between summary parts.
const SUMMARY_SEPARATOR: &str = " - ";

/// Summary for a candidate that failed the format check.
pub fn format_failure_summary() -> String {
    format!(
        "❌ Invalid format (expected {}-{} digits)",
        MIN_DIGITS, MAX_DIGITS
    )
}

/// Builds the human-readable verdict.
///
/// Metadata is appended only when it names a scheme; the scheme is
/// upper-cased and missing fields are skipped.
///
/// # Example
///
/// ```
/// use bincheck::directory::BinMetadata;
/// use bincheck::report::compose_summary;
///
/// let info = BinMetadata::with_scheme("visa").card_type("debit").country_name("Denmark");
/// assert_eq!(
///     compose_summary(true, Some(&info)),
///     "✅ Passes Luhn - VISA - debit - Denmark"
/// );
/// assert_eq!(compose_summary(false, None), "⚠️ Fails Luhn");
/// ```
pub fn compose_summary(luhn: bool, info: Option<&BinMetadata>) -> String {
    let mut summary = String::from(if luhn { LUHN_PASS } else { LUHN_FAIL });

    let Some(info) = info else {
        return summary;
    };
    let Some(scheme) = info.scheme.as_deref().filter(|s| !s.is_empty()) else {
        return summary;
    };

    let scheme = scheme.to_uppercase();
    let parts: Vec<&str> = std::iter::once(scheme.as_str())
        .chain(
            [
                &info.card_type,
                &info.brand,
                &info.bank_name,
                &info.country_name,
            ]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .filter(|s| !s.is_empty()),
        )
        .collect();

    summary.push_str(SUMMARY_SEPARATOR);
    summary.push_str(&parts.join(SUMMARY_SEPARATOR));
    summary
}

/// Machine-readable reason a single candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ItemError {
    /// Stable code, e.g. `INVALID_FORMAT`.
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

impl From<&FormatError> for ItemError {
    fn from(err: &FormatError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outcome for one candidate. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ValidationResult {
    masked: String,
    length: usize,
    luhn: Option<bool>,
    #[cfg_attr(feature = "server", schema(value_type = Option<String>, example = "411111"))]
    bin: Option<BinPrefix>,
    bin_info: Option<BinMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ItemError>,
    summary: String,
}

impl ValidationResult {
    /// Result for a candidate that failed the format check.
    pub fn malformed(normalized: &str, err: &FormatError) -> Self {
        Self {
            masked: mask(normalized),
            length: normalized.chars().count(),
            luhn: None,
            bin: None,
            bin_info: None,
            lookup: None,
            error: Some(ItemError::from(err)),
            summary: format_failure_summary(),
        }
    }

    /// Result for a well-formed candidate.
    pub fn checked(number: &NormalizedNumber, luhn: bool, outcome: LookupOutcome) -> Self {
        let lookup = outcome.diagnostic();
        let bin_info = outcome.into_metadata();
        Self {
            masked: number.masked(),
            length: number.length(),
            luhn: Some(luhn),
            bin: Some(number.bin_prefix()),
            summary: compose_summary(luhn, bin_info.as_ref()),
            bin_info,
            lookup,
            error: None,
        }
    }

    /// Masked display value.
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Length of the normalized input.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Checksum verdict; `None` when the format check failed.
    pub fn luhn(&self) -> Option<bool> {
        self.luhn
    }

    /// The lookup key, if the candidate was well formed.
    pub fn bin(&self) -> Option<&BinPrefix> {
        self.bin.as_ref()
    }

    /// Directory metadata, if the lookup succeeded.
    pub fn bin_info(&self) -> Option<&BinMetadata> {
        self.bin_info.as_ref()
    }

    /// Why metadata is missing, for well-formed candidates.
    pub fn lookup(&self) -> Option<&str> {
        self.lookup.as_deref()
    }

    /// Format failure, if any.
    pub fn error(&self) -> Option<&ItemError> {
        self.error.as_ref()
    }

    /// Human-readable verdict.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns true if the candidate passed the format check.
    pub fn is_well_formed(&self) -> bool {
        self.error.is_none()
    }
}

/// Results for a whole batch, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct BatchResponse {
    ok: bool,
    count: usize,
    results: Vec<ValidationResult>,
    note: String,
}

impl BatchResponse {
    pub(crate) fn new(results: Vec<ValidationResult>) -> Self {
        Self {
            ok: true,
            count: results.len(),
            results,
            note: USAGE_NOTE.to_string(),
        }
    }

    /// Always true; rejected batches never produce a response.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Number of results.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Results in input order.
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Consumes the response, returning the results.
    pub fn into_results(self) -> Vec<ValidationResult> {
        self.results
    }

    /// The usage disclaimer.
    pub fn note(&self) -> &str {
        &self.note
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::FailureKind;
    use crate::normalize::check_format;

    #[test]
    fn test_summary_full_metadata() {
        let info = BinMetadata::with_scheme("visa")
            .card_type("debit")
            .brand("Visa/Dankort")
            .bank_name("Jyske Bank")
            .country_name("Denmark");
        assert_eq!(
            compose_summary(true, Some(&info)),
            "✅ Passes Luhn - VISA - debit - Visa/Dankort - Jyske Bank - Denmark"
        );
    }

    #[test]
    fn test_summary_requires_scheme() {
        let info = BinMetadata::new().bank_name("Orphan Bank");
        assert_eq!(compose_summary(true, Some(&info)), LUHN_PASS);

        let info = BinMetadata::with_scheme("").bank_name("Orphan Bank");
        assert_eq!(compose_summary(false, Some(&info)), LUHN_FAIL);
    }

    #[test]
    fn test_format_failure_summary() {
        assert_eq!(
            format_failure_summary(),
            "❌ Invalid format (expected 12-19 digits)"
        );
    }

    #[test]
    fn test_malformed_result() {
        let err = check_format("abc").unwrap_err();
        let result = ValidationResult::malformed("abc", &err);

        assert_eq!(result.masked(), "***");
        assert_eq!(result.length(), 3);
        assert_eq!(result.luhn(), None);
        assert_eq!(result.bin(), None);
        assert_eq!(result.bin_info(), None);
        assert_eq!(result.error().map(|e| e.code.as_str()), Some("INVALID_FORMAT"));
        assert!(!result.is_well_formed());
    }

    #[test]
    fn test_checked_result_with_failed_lookup() {
        let number = check_format("4111111111111111").unwrap();
        let result =
            ValidationResult::checked(&number, true, LookupOutcome::Failed(FailureKind::Timeout));

        assert_eq!(result.masked(), "411111******1111");
        assert_eq!(result.length(), 16);
        assert_eq!(result.luhn(), Some(true));
        assert_eq!(result.bin().map(|b| b.as_str()), Some("411111"));
        assert_eq!(result.bin_info(), None);
        assert_eq!(result.lookup(), Some("lookup failed: timeout"));
        assert_eq!(result.summary(), LUHN_PASS);
    }

    #[test]
    fn test_serialized_shape() {
        let number = check_format("4111111111111111").unwrap();
        let result = ValidationResult::checked(
            &number,
            true,
            LookupOutcome::Found(BinMetadata::with_scheme("visa")),
        );
        let response = BatchResponse::new(vec![result]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["note"], USAGE_NOTE);
        let item = &json["results"][0];
        assert_eq!(item["masked"], "411111******1111");
        assert_eq!(item["length"], 16);
        assert_eq!(item["luhn"], true);
        assert_eq!(item["bin"], "411111");
        assert_eq!(item["bin_info"]["scheme"], "visa");
        assert_eq!(item["summary"], "✅ Passes Luhn - VISA");
        assert!(item.get("lookup").is_none());
        assert!(item.get("error").is_none());

        let serialized = serde_json::to_string(&response).unwrap();
        assert!(!serialized.contains("4111111111111111"));
    }

    #[test]
    fn test_serialized_malformed_has_null_luhn() {
        let err = check_format("12").unwrap_err();
        let response = BatchResponse::new(vec![ValidationResult::malformed("12", &err)]);
        let json = serde_json::to_value(&response).unwrap();
        let item = &json["results"][0];

        assert!(item["luhn"].is_null());
        assert!(item["bin"].is_null());
        assert!(item["bin_info"].is_null());
        assert_eq!(item["error"]["code"], "INVALID_FORMAT");
    }
}
