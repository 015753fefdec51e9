use serde::{Deserialize, Serialize};

/// A country code and the country it identifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    /// Dialing code, 1-3 digits (e.g. "389")
    pub country_code: String,

    /// ISO 3166-1 alpha-2 identifier, lowercase (e.g. "mk")
    pub country_identifier: String,

    /// Digits expected after the country code, when the numbering plan is fixed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_length: Option<usize>,
}

impl CountryEntry {
    /// Create a new country entry without a fixed national length.
    pub fn new(country_code: impl Into<String>, country_identifier: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            country_identifier: country_identifier.into(),
            national_length: None,
        }
    }

    /// Require a fixed number of digits after the country code.
    pub fn with_national_length(mut self, len: usize) -> Self {
        self.national_length = Some(len);
        self
    }
}

/// An operator prefix within a country and the MNO that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorEntry {
    /// Country code this prefix belongs to
    pub country_code: String,

    /// Network prefix following the country code (e.g. "77")
    pub prefix: String,

    /// Mobile network operator label
    pub mno: String,
}

impl OperatorEntry {
    /// Create a new operator entry.
    pub fn new(
        country_code: impl Into<String>,
        prefix: impl Into<String>,
        mno: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            prefix: prefix.into(),
            mno: mno.into(),
        }
    }
}
