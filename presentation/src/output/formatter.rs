//! Output formatter trait

use council_domain::{DeliberationOutcome, OutputFormat};

/// Trait for formatting deliberation outcomes
pub trait OutputFormatter {
    /// Every round in detail
    fn format_full(&self, outcome: &DeliberationOutcome) -> String;

    /// Verdict and final proposal only
    fn format_summary(&self, outcome: &DeliberationOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &DeliberationOutcome) -> String;

    /// Dispatch on the selected format
    fn render(&self, outcome: &DeliberationOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(outcome),
            OutputFormat::Summary => self.format_summary(outcome),
            OutputFormat::Json => self.format_json(outcome),
        }
    }
}
