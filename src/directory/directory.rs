//! Immutable prefix tables with longest-prefix lookup.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::builtin;
use super::types::{CountryEntry, OperatorEntry};

/// Longest country code accepted by the directory.
pub const MAX_COUNTRY_CODE_LEN: usize = 3;

/// Longest operator prefix accepted by the directory.
pub const MAX_OPERATOR_PREFIX_LEN: usize = 6;

/// Country and operator prefix tables.
///
/// Built once and never mutated. Share it behind an `Arc`; a reload
/// replaces the whole value.
#[derive(Debug, Clone)]
pub struct PrefixDirectory {
    /// Countries keyed by country code
    countries: HashMap<String, CountryEntry>,
    /// Operators per country code, longest prefix first
    operators: HashMap<String, Vec<OperatorEntry>>,
    /// Length of the longest configured country code
    max_code_len: usize,
}

impl PrefixDirectory {
    /// Build a directory from entries, validating every table invariant.
    pub fn new(
        countries: Vec<CountryEntry>,
        operators: Vec<OperatorEntry>,
    ) -> Result<Self, DirectoryError> {
        let mut by_code = HashMap::with_capacity(countries.len());
        let mut max_code_len = 0;

        for country in countries {
            validate_country(&country)?;
            max_code_len = max_code_len.max(country.country_code.len());
            if by_code.contains_key(&country.country_code) {
                return Err(DirectoryError::DuplicateCountry(country.country_code));
            }
            by_code.insert(country.country_code.clone(), country);
        }

        let mut seen = HashSet::with_capacity(operators.len());
        let mut by_country: HashMap<String, Vec<OperatorEntry>> = HashMap::new();

        for operator in operators {
            validate_operator(&operator)?;
            if !by_code.contains_key(&operator.country_code) {
                return Err(DirectoryError::UnknownCountryCode {
                    country_code: operator.country_code,
                    prefix: operator.prefix,
                });
            }
            if !seen.insert((operator.country_code.clone(), operator.prefix.clone())) {
                return Err(DirectoryError::DuplicateOperator {
                    country_code: operator.country_code,
                    prefix: operator.prefix,
                });
            }
            by_country
                .entry(operator.country_code.clone())
                .or_default()
                .push(operator);
        }

        // Longest prefix first so the first hit is the longest match
        for list in by_country.values_mut() {
            list.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then(a.prefix.cmp(&b.prefix)));
        }

        debug!(
            countries = by_code.len(),
            operators = seen.len(),
            "prefix directory built"
        );

        Ok(Self {
            countries: by_code,
            operators: by_country,
            max_code_len,
        })
    }

    /// Create a new directory builder.
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::default()
    }

    /// The built-in reference table.
    pub fn builtin() -> Self {
        let (countries, operators) = builtin::entries();
        Self::new(countries, operators).expect("built-in prefix table is valid")
    }

    /// Find the longest country code that prefixes `digits`.
    pub fn match_country(&self, digits: &str) -> Option<&CountryEntry> {
        let longest = self.max_code_len.min(digits.len());
        (1..=longest)
            .rev()
            .filter_map(|len| digits.get(..len))
            .find_map(|code| self.countries.get(code))
    }

    /// Find the operator of `country_code` whose prefix starts `remaining`.
    ///
    /// When several prefixes match, the longest one wins.
    pub fn match_operator(&self, country_code: &str, remaining: &str) -> Option<&OperatorEntry> {
        self.operators
            .get(country_code)?
            .iter()
            .find(|op| remaining.starts_with(op.prefix.as_str()))
    }

    /// Look up a country by its exact code.
    pub fn country(&self, country_code: &str) -> Option<&CountryEntry> {
        self.countries.get(country_code)
    }

    /// All countries, ordered by country code.
    pub fn countries(&self) -> Vec<&CountryEntry> {
        let mut list: Vec<_> = self.countries.values().collect();
        list.sort_by(|a, b| a.country_code.cmp(&b.country_code));
        list
    }

    /// All operators, ordered by country code then prefix.
    pub fn operators(&self) -> Vec<&OperatorEntry> {
        let mut list: Vec<_> = self.operators.values().flatten().collect();
        list.sort_by(|a, b| {
            a.country_code
                .cmp(&b.country_code)
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
        list
    }

    /// Number of countries.
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// Number of operator prefixes.
    pub fn operator_count(&self) -> usize {
        self.operators.values().map(Vec::len).sum()
    }

    /// True when no countries are configured.
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Copy of this directory with one more country.
    pub fn with_country(&self, entry: CountryEntry) -> Result<Self, DirectoryError> {
        let (mut countries, operators) = self.entries();
        countries.push(entry);
        Self::new(countries, operators)
    }

    /// Copy of this directory without `country_code` and its operators.
    pub fn without_country(&self, country_code: &str) -> Result<Self, DirectoryError> {
        if !self.countries.contains_key(country_code) {
            return Err(DirectoryError::CountryNotFound(country_code.to_string()));
        }

        let (mut countries, mut operators) = self.entries();
        countries.retain(|c| c.country_code != country_code);
        operators.retain(|op| op.country_code != country_code);
        Self::new(countries, operators)
    }

    /// Copy of this directory with one more operator prefix.
    pub fn with_operator(&self, entry: OperatorEntry) -> Result<Self, DirectoryError> {
        let (countries, mut operators) = self.entries();
        operators.push(entry);
        Self::new(countries, operators)
    }

    /// Copy of this directory without the operator prefix `prefix` of `country_code`.
    pub fn without_operator(&self, country_code: &str, prefix: &str) -> Result<Self, DirectoryError> {
        let exists = self
            .operators
            .get(country_code)
            .is_some_and(|list| list.iter().any(|op| op.prefix == prefix));
        if !exists {
            return Err(DirectoryError::OperatorNotFound {
                country_code: country_code.to_string(),
                prefix: prefix.to_string(),
            });
        }

        let (countries, mut operators) = self.entries();
        operators.retain(|op| !(op.country_code == country_code && op.prefix == prefix));
        Self::new(countries, operators)
    }

    fn entries(&self) -> (Vec<CountryEntry>, Vec<OperatorEntry>) {
        (
            self.countries().into_iter().cloned().collect(),
            self.operators().into_iter().cloned().collect(),
        )
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn validate_country(entry: &CountryEntry) -> Result<(), DirectoryError> {
    let code = &entry.country_code;
    if !is_digits(code) || code.len() > MAX_COUNTRY_CODE_LEN {
        return Err(DirectoryError::InvalidCountryCode(code.clone()));
    }

    let id = &entry.country_identifier;
    if id.len() != 2 || !id.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(DirectoryError::InvalidCountryIdentifier {
            country_code: code.clone(),
            identifier: id.clone(),
        });
    }

    if entry.national_length == Some(0) {
        return Err(DirectoryError::InvalidNationalLength(code.clone()));
    }

    Ok(())
}

fn validate_operator(entry: &OperatorEntry) -> Result<(), DirectoryError> {
    if !is_digits(&entry.prefix) || entry.prefix.len() > MAX_OPERATOR_PREFIX_LEN {
        return Err(DirectoryError::InvalidOperatorPrefix {
            country_code: entry.country_code.clone(),
            prefix: entry.prefix.clone(),
        });
    }

    if entry.mno.trim().is_empty() {
        return Err(DirectoryError::EmptyMno {
            country_code: entry.country_code.clone(),
            prefix: entry.prefix.clone(),
        });
    }

    Ok(())
}

/// Builder for PrefixDirectory.
#[derive(Debug, Default)]
pub struct DirectoryBuilder {
    countries: Vec<CountryEntry>,
    operators: Vec<OperatorEntry>,
}

impl DirectoryBuilder {
    /// Add a country.
    pub fn country(mut self, code: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.countries.push(CountryEntry::new(code, identifier));
        self
    }

    /// Add a country with a fixed national number length.
    pub fn country_with_length(
        mut self,
        code: impl Into<String>,
        identifier: impl Into<String>,
        national_length: usize,
    ) -> Self {
        self.countries
            .push(CountryEntry::new(code, identifier).with_national_length(national_length));
        self
    }

    /// Add an operator prefix.
    pub fn operator(
        mut self,
        country_code: impl Into<String>,
        prefix: impl Into<String>,
        mno: impl Into<String>,
    ) -> Self {
        self.operators
            .push(OperatorEntry::new(country_code, prefix, mno));
        self
    }

    /// Add pre-built entries.
    pub fn extend(
        mut self,
        countries: impl IntoIterator<Item = CountryEntry>,
        operators: impl IntoIterator<Item = OperatorEntry>,
    ) -> Self {
        self.countries.extend(countries);
        self.operators.extend(operators);
        self
    }

    /// Build and validate the directory.
    pub fn build(self) -> Result<PrefixDirectory, DirectoryError> {
        PrefixDirectory::new(self.countries, self.operators)
    }
}

/// Directory construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Invalid country code '{0}': expected 1-3 digits")]
    InvalidCountryCode(String),

    #[error("Invalid country identifier '{identifier}' for code {country_code}: expected two lowercase letters")]
    InvalidCountryIdentifier {
        country_code: String,
        identifier: String,
    },

    #[error("Country code {0} declares a national length of zero")]
    InvalidNationalLength(String),

    #[error("Duplicate country code {0}")]
    DuplicateCountry(String),

    #[error("Invalid operator prefix '{prefix}' for country code {country_code}")]
    InvalidOperatorPrefix {
        country_code: String,
        prefix: String,
    },

    #[error("Operator prefix {prefix} has an empty MNO label (country code {country_code})")]
    EmptyMno {
        country_code: String,
        prefix: String,
    },

    #[error("Operator prefix {prefix} references unknown country code {country_code}")]
    UnknownCountryCode {
        country_code: String,
        prefix: String,
    },

    #[error("Duplicate operator prefix {prefix} for country code {country_code}")]
    DuplicateOperator {
        country_code: String,
        prefix: String,
    },

    #[error("Country code {0} not found")]
    CountryNotFound(String),

    #[error("Operator prefix {prefix} not found for country code {country_code}")]
    OperatorNotFound {
        country_code: String,
        prefix: String,
    },
}
