//! Built-in reference table.
//!
//! Covers the numbering plans shipped by default. Deployments extend or
//! replace it through the `directory` section of the config.

use super::types::{CountryEntry, OperatorEntry};

/// (country code, identifier, national length)
const COUNTRIES: &[(&str, &str, Option<usize>)] = &[
    ("242", "cg", Some(9)),
    ("258", "mz", Some(9)),
    ("350", "gi", Some(8)),
    ("381", "rs", None),
    ("385", "hr", None),
    ("386", "si", Some(8)),
    ("387", "ba", Some(8)),
    ("389", "mk", Some(8)),
    ("423", "li", Some(7)),
    ("48", "pl", Some(9)),
];

/// (country code, operator prefix, MNO)
const OPERATORS: &[(&str, &str, &str)] = &[
    // Republic of the Congo
    ("242", "05", "Airtel Congo"),
    ("242", "06", "MTN Congo"),
    // Mozambique
    ("258", "82", "Tmcel"),
    ("258", "83", "Tmcel"),
    ("258", "84", "Vodacom"),
    ("258", "85", "Vodacom"),
    ("258", "86", "Movitel"),
    ("258", "87", "Movitel"),
    // Gibraltar
    ("350", "54", "Gibtelecom"),
    ("350", "56", "Gibtelecom"),
    ("350", "57", "Gibtelecom"),
    ("350", "58", "Gibtelecom"),
    // Serbia
    ("381", "60", "A1 Srbija"),
    ("381", "61", "A1 Srbija"),
    ("381", "62", "Yettel"),
    ("381", "63", "Yettel"),
    ("381", "64", "mts"),
    ("381", "65", "mts"),
    ("381", "66", "mts"),
    ("381", "69", "Yettel"),
    // Croatia
    ("385", "91", "A1 Hrvatska"),
    ("385", "95", "Telemach"),
    ("385", "97", "Hrvatski Telekom"),
    ("385", "98", "Hrvatski Telekom"),
    ("385", "99", "Hrvatski Telekom"),
    // Slovenia
    ("386", "30", "A1 Slovenija"),
    ("386", "31", "Telekom Slovenije"),
    ("386", "40", "A1 Slovenija"),
    ("386", "41", "Telekom Slovenije"),
    ("386", "51", "Telekom Slovenije"),
    ("386", "64", "T-2"),
    ("386", "68", "A1 Slovenija"),
    ("386", "70", "Telemach"),
    // Bosnia and Herzegovina
    ("387", "61", "BH Telecom"),
    ("387", "62", "BH Telecom"),
    ("387", "63", "HT Eronet"),
    ("387", "65", "m:tel"),
    ("387", "66", "m:tel"),
    // North Macedonia
    ("389", "70", "Telekom"),
    ("389", "71", "Telekom"),
    ("389", "72", "Telekom"),
    ("389", "75", "A1"),
    ("389", "76", "A1"),
    ("389", "77", "A1"),
    ("389", "78", "A1"),
    ("389", "79", "Lycamobile"),
    // Liechtenstein
    ("423", "66", "FL1"),
    ("423", "77", "Swisscom"),
    ("423", "78", "Salt"),
    ("423", "79", "7acht"),
    // Poland
    ("48", "50", "Orange Polska"),
    ("48", "510", "Orange Polska"),
    ("48", "53", "Orange Polska"),
    ("48", "532", "T-Mobile Polska"),
    ("48", "538", "T-Mobile Polska"),
    ("48", "539", "T-Mobile Polska"),
    ("48", "5366", "Polskie Sieci Cyfrowe"),
    ("48", "60", "T-Mobile Polska"),
    ("48", "69", "Polskie Sieci Cyfrowe"),
    ("48", "79", "Play"),
];

/// Built-in entries as owned values.
pub(super) fn entries() -> (Vec<CountryEntry>, Vec<OperatorEntry>) {
    let countries = COUNTRIES
        .iter()
        .map(|&(code, id, national_length)| CountryEntry {
            country_code: code.to_string(),
            country_identifier: id.to_string(),
            national_length,
        })
        .collect();

    let operators = OPERATORS
        .iter()
        .map(|&(code, prefix, mno)| OperatorEntry::new(code, prefix, mno))
        .collect();

    (countries, operators)
}
