//! Classification errors.

use std::fmt;

/// Why a number was rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatViolation {
    /// Fewer digits than the configured minimum
    TooShort { digits: usize, min: usize },
    /// More digits than the configured maximum
    TooLong { digits: usize, max: usize },
    /// Nothing left after the country code and operator prefix
    NoSubscriberDigits,
    /// Digits after the country code don't fit the country's numbering plan
    NationalLength { expected: usize, actual: usize },
}

impl fmt::Display for FormatViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { digits, min } => {
                write!(f, "{} digits, at least {} required", digits, min)
            }
            Self::TooLong { digits, max } => {
                write!(f, "{} digits, at most {} allowed", digits, max)
            }
            Self::NoSubscriberDigits => write!(f, "no subscriber digits after operator prefix"),
            Self::NationalLength { expected, actual } => write!(
                f,
                "{} digits after country code, numbering plan requires {}",
                actual, expected
            ),
        }
    }
}

/// Classification failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("Invalid MSISDN format: {0}")]
    InvalidFormat(FormatViolation),

    #[error("No country code matches '{digits}'")]
    UnknownCountry { digits: String },

    #[error("No operator prefix for country code {country_code} matches '{remaining}'")]
    UnknownOperator {
        country_code: String,
        remaining: String,
    },
}

impl ClassificationError {
    /// The error kind, without context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Self::UnknownCountry { .. } => ErrorKind::UnknownCountry,
            Self::UnknownOperator { .. } => ErrorKind::UnknownOperator,
        }
    }
}

/// Classification error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    UnknownCountry,
    UnknownOperator,
}

impl ErrorKind {
    /// Stable snake_case name (used as a metric label).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::UnknownCountry => "unknown_country",
            Self::UnknownOperator => "unknown_operator",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
