//! MSISDN lookup service.
//!
//! Classifies phone-number-like strings into mobile network operator,
//! country code, subscriber number and country identifier using a
//! longest-prefix [`directory::PrefixDirectory`], and serves the result
//! over HTTP.

pub mod api;
pub mod bootstrap;
pub mod classifier;
pub mod config;
pub mod directory;
pub mod telemetry;

pub use classifier::{ClassificationError, ClassificationResult, Classifier, ErrorKind};
pub use directory::PrefixDirectory;
