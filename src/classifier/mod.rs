//! MSISDN classification.
//!
//! Decomposes a raw phone-number string into:
//! - Mobile network operator (MNO)
//! - Country code
//! - Subscriber number
//! - Country identifier
//!
//! using longest-prefix matches against a [`PrefixDirectory`](crate::directory::PrefixDirectory).

mod classifier;
mod error;

pub use classifier::{normalize, ClassificationResult, Classifier, ClassifierLimits, LimitsError};
pub use error::{ClassificationError, ErrorKind, FormatViolation};
