//! Boundary rendering of classification outcomes.
//!
//! This is the only place where error kinds are collapsed: every failure
//! renders as the single line `Error`.

use crate::classifier::{ClassificationError, ClassificationResult};

/// The single line rendered for any classification failure.
pub const ERROR_LINE: &str = "Error";

/// Render an outcome as display lines.
///
/// Success yields four `label: value` lines in fixed order; failure yields
/// exactly one line.
pub fn render_lines(outcome: &Result<ClassificationResult, ClassificationError>) -> Vec<String> {
    match outcome {
        Ok(result) => vec![
            format!("MNO: {}", result.mno),
            format!("Country Code: {}", result.country_code),
            format!("Subscriber Number: {}", result.subscriber_number),
            format!("Country Identifier: {}", result.country_identifier),
        ],
        Err(_) => vec![ERROR_LINE.to_string()],
    }
}

/// Render an outcome as newline-terminated text.
pub fn render_text(outcome: &Result<ClassificationResult, ClassificationError>) -> String {
    let mut text = render_lines(outcome).join("\n");
    text.push('\n');
    text
}
