//! The classifier: normalize, validate, decompose.

use std::sync::Arc;

use serde::Deserialize;
use tracing::trace;

use crate::directory::PrefixDirectory;

use super::error::{ClassificationError, FormatViolation};

/// Successful decomposition of an MSISDN.
///
/// `country_code + operator_prefix + subscriber_number` is exactly the
/// normalized input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Mobile network operator
    pub mno: String,
    /// Country dialing code
    pub country_code: String,
    /// Matched operator prefix
    pub operator_prefix: String,
    /// Digits after the operator prefix
    pub subscriber_number: String,
    /// Two-letter lowercase country identifier
    pub country_identifier: String,
}

impl ClassificationResult {
    /// Rebuild the normalized digit string.
    pub fn digits(&self) -> String {
        [
            self.country_code.as_str(),
            self.operator_prefix.as_str(),
            self.subscriber_number.as_str(),
        ]
        .concat()
    }
}

/// Digit-count bounds applied after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClassifierLimits {
    /// Minimum digits (country code + operator prefix + one subscriber digit)
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Maximum digits (E.164 allows 15)
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ClassifierLimits {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

fn default_min_length() -> usize {
    7
}

fn default_max_length() -> usize {
    15
}

/// Largest accepted `max_length`.
const LIMIT_CEILING: usize = 32;

impl ClassifierLimits {
    /// Check that the bounds are usable.
    pub fn validate(&self) -> Result<(), LimitsError> {
        if self.min_length < 2 {
            return Err(LimitsError::MinTooSmall(self.min_length));
        }
        if self.max_length > LIMIT_CEILING {
            return Err(LimitsError::MaxTooLarge(self.max_length));
        }
        if self.min_length > self.max_length {
            return Err(LimitsError::Inverted {
                min: self.min_length,
                max: self.max_length,
            });
        }
        Ok(())
    }
}

/// Invalid classifier limits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimitsError {
    #[error("min_length must be at least 2, got {0}")]
    MinTooSmall(usize),

    #[error("max_length must be at most 32, got {0}")]
    MaxTooLarge(usize),

    #[error("min_length {min} exceeds max_length {max}")]
    Inverted { min: usize, max: usize },
}

/// Strip every character that is not an ASCII decimal digit.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// MSISDN classifier over an injected prefix directory.
///
/// Stateless: every call is an independent pure transformation, so a
/// shared `Classifier` can be used from any number of tasks.
#[derive(Debug, Clone)]
pub struct Classifier {
    directory: Arc<PrefixDirectory>,
    limits: ClassifierLimits,
}

impl Classifier {
    /// Create a classifier with default limits.
    pub fn new(directory: Arc<PrefixDirectory>) -> Self {
        Self {
            directory,
            limits: ClassifierLimits::default(),
        }
    }

    /// Create a classifier with custom limits.
    pub fn with_limits(
        directory: Arc<PrefixDirectory>,
        limits: ClassifierLimits,
    ) -> Result<Self, LimitsError> {
        limits.validate()?;
        Ok(Self { directory, limits })
    }

    /// Same limits over a different directory.
    pub fn with_directory(&self, directory: Arc<PrefixDirectory>) -> Self {
        Self {
            directory,
            limits: self.limits,
        }
    }

    /// The directory this classifier reads.
    pub fn directory(&self) -> &Arc<PrefixDirectory> {
        &self.directory
    }

    /// The active limits.
    pub fn limits(&self) -> ClassifierLimits {
        self.limits
    }

    /// Classify a raw MSISDN string.
    pub fn classify(&self, raw: &str) -> Result<ClassificationResult, ClassificationError> {
        let digits = normalize(raw);
        let len = digits.len();

        if len < self.limits.min_length {
            return Err(ClassificationError::InvalidFormat(FormatViolation::TooShort {
                digits: len,
                min: self.limits.min_length,
            }));
        }
        if len > self.limits.max_length {
            return Err(ClassificationError::InvalidFormat(FormatViolation::TooLong {
                digits: len,
                max: self.limits.max_length,
            }));
        }

        let country = self
            .directory
            .match_country(&digits)
            .ok_or_else(|| ClassificationError::UnknownCountry {
                digits: digits.clone(),
            })?;

        let national = &digits[country.country_code.len()..];

        let operator = self
            .directory
            .match_operator(&country.country_code, national)
            .ok_or_else(|| ClassificationError::UnknownOperator {
                country_code: country.country_code.clone(),
                remaining: national.to_string(),
            })?;

        let subscriber = &national[operator.prefix.len()..];
        if subscriber.is_empty() {
            return Err(ClassificationError::InvalidFormat(
                FormatViolation::NoSubscriberDigits,
            ));
        }

        if let Some(expected) = country.national_length {
            if national.len() != expected {
                return Err(ClassificationError::InvalidFormat(
                    FormatViolation::NationalLength {
                        expected,
                        actual: national.len(),
                    },
                ));
            }
        }

        trace!(
            country_code = %country.country_code,
            prefix = %operator.prefix,
            mno = %operator.mno,
            "msisdn classified"
        );

        Ok(ClassificationResult {
            mno: operator.mno.clone(),
            country_code: country.country_code.clone(),
            operator_prefix: operator.prefix.clone(),
            subscriber_number: subscriber.to_string(),
            country_identifier: country.country_identifier.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ErrorKind;

    fn builtin() -> Classifier {
        Classifier::new(Arc::new(PrefixDirectory::builtin()))
    }

    fn classifier(dir: PrefixDirectory) -> Classifier {
        Classifier::new(Arc::new(dir))
    }

    // ============================================================================
    // Normalization Tests
    // ============================================================================

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("+389-77-123456"), "38977123456");
        assert_eq!(normalize("389 77 123 456"), "38977123456");
        assert_eq!(normalize("(389) 77.123.456"), "38977123456");
        assert_eq!(normalize("lorem ipsum"), "");
        assert_eq!(normalize(""), "");
        // Non-ASCII digits are not decimal digits for our purposes
        assert_eq!(normalize("٣٨٩77"), "77");
    }

    // ============================================================================
    // Reference Scenarios
    // ============================================================================

    #[test]
    fn test_reference_number() {
        let result = builtin().classify("38977123456").unwrap();
        assert_eq!(result.mno, "A1");
        assert_eq!(result.country_code, "389");
        assert_eq!(result.operator_prefix, "77");
        assert_eq!(result.subscriber_number, "123456");
        assert_eq!(result.country_identifier, "mk");
    }

    #[test]
    fn test_short_number_is_invalid_format() {
        let err = builtin().classify("123456").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(
            err,
            ClassificationError::InvalidFormat(FormatViolation::TooShort { digits: 6, min: 7 })
        );
    }

    #[test]
    fn test_unregistered_operator_prefix() {
        let err = builtin().classify("38900123456").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOperator);
        assert_eq!(
            err,
            ClassificationError::UnknownOperator {
                country_code: "389".to_string(),
                remaining: "00123456".to_string(),
            }
        );
    }

    #[test]
    fn test_punctuated_input_matches_plain_input() {
        let c = builtin();
        assert_eq!(c.classify("+389-77-123456"), c.classify("38977123456"));
        assert!(c.classify("+389-77-123456").is_ok());
    }

    #[test]
    fn test_empty_input() {
        let err = builtin().classify("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_unknown_country() {
        let err = builtin().classify("11177554333").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCountry);

        // Neither "6", "69" nor "693" is configured
        let err = builtin().classify("6934567890").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCountry);
    }

    // ============================================================================
    // Length Tests
    // ============================================================================

    #[test]
    fn test_every_short_length_is_invalid_format() {
        let c = builtin();
        let digits = "38977123456";
        for len in 0..c.limits().min_length {
            let err = c.classify(&digits[..len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat, "length {len}");
        }
    }

    #[test]
    fn test_too_long_is_invalid_format() {
        let err = builtin()
            .classify("237128937019023213123121232")
            .unwrap_err();
        assert_eq!(
            err,
            ClassificationError::InvalidFormat(FormatViolation::TooLong { digits: 27, max: 15 })
        );
    }

    #[test]
    fn test_national_length_enforced() {
        let c = builtin();
        let err = c.classify("3897712345").unwrap_err();
        assert_eq!(
            err,
            ClassificationError::InvalidFormat(FormatViolation::NationalLength {
                expected: 8,
                actual: 7,
            })
        );
        assert!(c.classify("389771234567").is_err());
    }

    #[test]
    fn test_no_subscriber_digits() {
        let c = classifier(
            PrefixDirectory::builder()
                .country("389", "mk")
                .operator("389", "7712", "Test")
                .build()
                .unwrap(),
        );
        // 3 + 4 = 7 digits, nothing left for the subscriber
        let err = c.classify("3897712").unwrap_err();
        assert_eq!(
            err,
            ClassificationError::InvalidFormat(FormatViolation::NoSubscriberDigits)
        );
    }

    // ============================================================================
    // Longest Prefix Tests
    // ============================================================================

    #[test]
    fn test_longest_country_code_wins() {
        let c = classifier(
            PrefixDirectory::builder()
                .country("38", "xx")
                .country("389", "mk")
                .operator("38", "97", "Shadow")
                .operator("389", "77", "A1")
                .build()
                .unwrap(),
        );
        let result = c.classify("38977123456").unwrap();
        assert_eq!(result.country_code, "389");
        assert_eq!(result.mno, "A1");
    }

    #[test]
    fn test_longest_operator_prefix_wins() {
        let c = builtin();
        let result = c.classify("48536612345").unwrap();
        assert_eq!(result.mno, "Polskie Sieci Cyfrowe");
        assert_eq!(result.operator_prefix, "5366");
        assert_eq!(result.subscriber_number, "12345");

        let result = c.classify("48530012345").unwrap();
        assert_eq!(result.mno, "Orange Polska");
        assert_eq!(result.operator_prefix, "53");
    }

    // ============================================================================
    // Property Tests
    // ============================================================================

    #[test]
    fn test_decomposition_is_lossless() {
        let c = builtin();
        let inputs = [
            "38977123456",
            "+389 70 000 001",
            "258841234567",
            "48510123456",
            "48536612345",
            "4237712345",
            "35054123456",
            "242061234567",
            "381641234567",
            "385911234567",
        ];
        for input in inputs {
            let result = c.classify(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            assert_eq!(result.digits(), normalize(input), "{input}");
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let c = builtin();
        for input in ["38977123456", "123456", "38900123456", "", "+389-77-123456"] {
            assert_eq!(c.classify(input), c.classify(input), "{input}");
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let c = builtin();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = c.clone();
                std::thread::spawn(move || c.classify("38977123456").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().mno, "A1");
        }
    }

    // ============================================================================
    // Limits Tests
    // ============================================================================

    #[test]
    fn test_custom_limits() {
        let dir = Arc::new(PrefixDirectory::builtin());
        let limits = ClassifierLimits { min_length: 12, max_length: 15 };
        let c = Classifier::with_limits(dir, limits).unwrap();
        let err = c.classify("38977123456").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_limits_validation() {
        assert!(ClassifierLimits::default().validate().is_ok());
        assert_eq!(
            ClassifierLimits { min_length: 1, max_length: 15 }.validate(),
            Err(LimitsError::MinTooSmall(1))
        );
        assert_eq!(
            ClassifierLimits { min_length: 7, max_length: 40 }.validate(),
            Err(LimitsError::MaxTooLarge(40))
        );
        assert_eq!(
            ClassifierLimits { min_length: 9, max_length: 8 }.validate(),
            Err(LimitsError::Inverted { min: 9, max: 8 })
        );
    }

    #[test]
    fn test_with_directory_keeps_limits() {
        let limits = ClassifierLimits { min_length: 12, max_length: 14 };
        let original = Classifier::with_limits(Arc::new(PrefixDirectory::builtin()), limits).unwrap();

        let directory = PrefixDirectory::builder()
            .country("386", "si")
            .operator("386", "41", "Telekom Slovenije")
            .build()
            .unwrap();
        let swapped = original.with_directory(Arc::new(directory));

        assert_eq!(swapped.limits(), limits);
        assert_eq!(swapped.classify("386411234567").unwrap().mno, "Telekom Slovenije");
        assert_eq!(
            swapped.classify("38641123456").unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );
        assert!(original.classify("386411234567").is_err());
    }
}
