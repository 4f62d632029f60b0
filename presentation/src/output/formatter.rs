//! Output formatter trait

use moa_application::ScenarioRunOutput;
use moa_domain::OutputFormat;

/// Trait for formatting scenario run results
pub trait OutputFormatter {
    /// Format the complete run: every model's answer, then the aggregation
    fn format(&self, output: &ScenarioRunOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &ScenarioRunOutput) -> String;

    /// Format the aggregated answer only (concise output)
    fn format_aggregated_only(&self, output: &ScenarioRunOutput) -> String;

    /// Dispatch on the selected output format
    fn render(&self, output: &ScenarioRunOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(output),
            OutputFormat::Aggregated => self.format_aggregated_only(output),
            OutputFormat::Json => self.format_json(output),
        }
    }
}
