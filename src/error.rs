//! Error types for card number checking.
//!
//! Request-shape errors stop a batch before any work is done. Format and digit
//! errors describe a single candidate and end up inside its result instead of
//! aborting anything. Every request-facing error has a stable `code()` so
//! callers can branch without parsing messages.

use std::fmt;

/// Rejections of the batch as a whole.
///
/// Nothing is checked or looked up when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No candidates were supplied.
    EmptyInput,

    /// More candidates than the configured cap.
    TooManyItems {
        /// Number of candidates received.
        count: usize,
        /// The configured maximum (20 by default).
        maximum: usize,
    },

    /// A candidate could not be read as text at all.
    MalformedItem {
        /// Position of the offending entry in the request.
        index: usize,
    },
}

impl RequestError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EMPTY_INPUT",
            Self::TooManyItems { .. } => "TOO_MANY_ITEMS",
            Self::MalformedItem { .. } => "MALFORMED_ITEM",
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no card numbers supplied"),
            Self::TooManyItems { count, maximum } => {
                write!(
                    f,
                    "too many card numbers: got {}, maximum is {} per request",
                    count, maximum
                )
            }
            Self::MalformedItem { index } => {
                write!(f, "entry {} is not a string or number", index)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Why a single candidate failed the format check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Nothing left after stripping separators.
    Empty,

    /// Fewer digits than the minimum.
    TooShort {
        /// Normalized length.
        length: usize,
        /// Minimum accepted length (12).
        minimum: usize,
    },

    /// More digits than the maximum.
    TooLong {
        /// Normalized length.
        length: usize,
        /// Maximum accepted length (19).
        maximum: usize,
    },

    /// A non-digit survived normalization.
    InvalidCharacter {
        /// Character index in the normalized string.
        position: usize,
        /// The offending character.
        character: char,
    },
}

impl FormatError {
    /// Stable machine-readable code shared by all format failures.
    pub const fn code(&self) -> &'static str {
        "INVALID_FORMAT"
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "card number is empty"),
            Self::TooShort { length, minimum } => {
                write!(
                    f,
                    "card number too short: got {} digits, minimum is {}",
                    length, minimum
                )
            }
            Self::TooLong { length, maximum } => {
                write!(
                    f,
                    "card number too long: got {} digits, maximum is {}",
                    length, maximum
                )
            }
            Self::InvalidCharacter {
                position,
                character,
            } => {
                write!(
                    f,
                    "invalid character '{}' at position {} (only digits, spaces, and hyphens allowed)",
                    character.escape_default(),
                    position
                )
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// A Luhn input contained something other than an ASCII digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDigitError {
    /// Character index of the first non-digit.
    pub position: usize,
    /// The offending character.
    pub character: char,
}

impl fmt::Display for InvalidDigitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' at position {} is not a decimal digit",
            self.character.escape_default(),
            self.position
        )
    }
}

impl std::error::Error for InvalidDigitError {}

/// Errors building or loading a BIN directory.
#[derive(Debug)]
pub enum DirectoryError {
    /// Failed to read the directory file.
    Io(std::io::Error),
    /// The file is not valid directory JSON.
    Parse(serde_json::Error),
    /// An entry has an unusable prefix or range.
    InvalidEntry(String),
    /// The directory base URL does not parse.
    InvalidUrl(String),
    /// The HTTP client could not be built.
    Client(reqwest::Error),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidEntry(s) => write!(f, "Invalid entry: {}", s),
            Self::InvalidUrl(s) => write!(f, "Invalid directory URL: {}", s),
            Self::Client(e) => write!(f, "HTTP client error: {}", e),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Client(e) => Some(e),
            Self::InvalidEntry(_) | Self::InvalidUrl(_) => None,
        }
    }
}

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Client(err)
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
