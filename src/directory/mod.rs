//! Prefix directory.
//!
//! Static reference data used to decompose an MSISDN:
//! - Country codes (1-3 digits) mapped to a two-letter country identifier
//! - Operator prefixes per country code mapped to an MNO label
//!
//! Both lookups are longest-prefix matches over an immutable table.

mod builtin;
mod directory;
mod types;

pub use directory::{DirectoryBuilder, DirectoryError, PrefixDirectory};
pub use types::{CountryEntry, OperatorEntry};
