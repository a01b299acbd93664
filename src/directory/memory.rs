//! In-memory BIN directory.
//!
//! Entries are exact prefixes or inclusive prefix ranges, kept sorted by
//! range start. When several entries cover a prefix, the narrowest wins, so
//! an exact entry overrides a range that contains it.
//!
//! # JSON format
//!
//! ```json
//! [
//!   { "bin": "411111", "scheme": "visa", "bank_name": "Test Bank" },
//!   { "bin_start": "510000", "bin_end": "559999", "scheme": "mastercard" }
//! ]
//! ```

use super::{BinDirectory, BinMetadata, LookupOutcome};
use crate::error::DirectoryError;
use crate::number::BinPrefix;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

/// An inclusive range of six-digit prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    /// Start of the range (inclusive).
    pub start: u32,
    /// End of the range (inclusive).
    pub end: u32,
}

impl BinRange {
    /// Creates a range, swapping the bounds if given in reverse.
    pub fn new(start: BinPrefix, end: BinPrefix) -> Self {
        let (a, b) = (start.value(), end.value());
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A range covering exactly one prefix.
    pub fn single(prefix: BinPrefix) -> Self {
        Self::new(prefix, prefix)
    }

    /// Checks if a prefix falls within this range.
    #[inline]
    pub fn contains(&self, prefix: &BinPrefix) -> bool {
        let value = prefix.value();
        value >= self.start && value <= self.end
    }

    #[inline]
    fn width(&self) -> u32 {
        self.end - self.start
    }
}

/// Offline directory backed by a sorted vector.
///
/// # Example
///
/// ```
/// use bincheck::directory::{BinMetadata, MemoryDirectory};
///
/// let mut directory = MemoryDirectory::new();
/// directory.insert("411111", BinMetadata::with_scheme("visa"));
/// directory.insert_range("510000", "559999", BinMetadata::with_scheme("mastercard"));
/// assert_eq!(directory.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    /// Sorted by range start.
    entries: Vec<(BinRange, BinMetadata)>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an exact prefix. Returns false if `bin` is not six digits.
    pub fn insert(&mut self, bin: &str, info: BinMetadata) -> bool {
        match BinPrefix::parse(bin) {
            Some(prefix) => {
                self.insert_entry(BinRange::single(prefix), info);
                true
            }
            None => false,
        }
    }

    /// Inserts an inclusive range. Returns false if either bound is not six digits.
    pub fn insert_range(&mut self, start: &str, end: &str, info: BinMetadata) -> bool {
        match (BinPrefix::parse(start), BinPrefix::parse(end)) {
            (Some(start), Some(end)) => {
                self.insert_entry(BinRange::new(start, end), info);
                true
            }
            _ => false,
        }
    }

    fn insert_entry(&mut self, range: BinRange, info: BinMetadata) {
        let at = self
            .entries
            .partition_point(|(existing, _)| existing.start <= range.start);
        self.entries.insert(at, (range, info));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the narrowest entry covering `prefix`.
    pub fn get(&self, prefix: &BinPrefix) -> Option<&BinMetadata> {
        let value = prefix.value();
        // Only entries starting at or before the prefix can contain it.
        let candidates = self.entries.partition_point(|(range, _)| range.start <= value);
        self.entries[..candidates]
            .iter()
            .filter(|(range, _)| range.contains(prefix))
            .min_by_key(|(range, _)| range.width())
            .map(|(_, info)| info)
    }

    /// Loads a directory from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads a directory from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DirectoryError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_json(&content)
    }

    /// Loads a directory from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let records: Vec<DirectoryRecord> = serde_json::from_str(json)?;
        let mut directory = Self::new();

        for (index, record) in records.into_iter().enumerate() {
            let inserted = match (&record.bin, &record.bin_start, &record.bin_end) {
                (Some(bin), None, None) => directory.insert(bin, record.info),
                (None, Some(start), Some(end)) => directory.insert_range(start, end, record.info),
                _ => {
                    return Err(DirectoryError::InvalidEntry(format!(
                        "entry {} needs either \"bin\" or both \"bin_start\" and \"bin_end\"",
                        index
                    )))
                }
            };
            if !inserted {
                return Err(DirectoryError::InvalidEntry(format!(
                    "entry {} has a prefix that is not six digits",
                    index
                )));
            }
        }

        Ok(directory)
    }
}

impl BinDirectory for MemoryDirectory {
    async fn lookup(&self, prefix: &BinPrefix) -> LookupOutcome {
        match self.get(prefix) {
            Some(info) => LookupOutcome::Found(info.clone()),
            None => LookupOutcome::NotFound,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryRecord {
    #[serde(default)]
    bin: Option<String>,
    #[serde(default)]
    bin_start: Option<String>,
    #[serde(default)]
    bin_end: Option<String>,
    #[serde(flatten)]
    info: BinMetadata,
}
