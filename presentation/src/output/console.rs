//! Console output formatter for MOA results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use moa_application::ScenarioRunOutput;
use moa_domain::aggregation::ALL_FAILED_MESSAGE;
use moa_domain::prompt::RESPONSE_SEPARATOR;
use moa_domain::{
    InvocationResult, MergeMethod, Scenario, StrategyOutcome, ValidationReport,
    analyze_response, calculate_consensus, compare_responses, find_best_response,
    merge_responses,
};
use serde::Serialize;

/// Unique words listed per model in comparison output
const MAX_UNIQUE_WORDS: usize = 10;

/// Formats MOA results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a complete scenario run
    pub fn format(output: &ScenarioRunOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("MOA Results"));
        out.push('\n');

        out.push_str(&format!(
            "{} {}\n",
            "Scenario:".cyan().bold(),
            output.scenario_name
        ));
        out.push_str(&format!(
            "{} {}\n\n",
            "Strategy:".cyan().bold(),
            output.strategy
        ));

        out.push_str(&Self::section_header("Individual Responses"));
        out.push_str(&Self::format_results(&output.individual_results));

        if let Some(aggregation) = &output.aggregated_result {
            out.push_str(&Self::section_header("Aggregated Response"));
            out.push_str(&format!(
                "\n{}\n\n{}\n",
                format!("Aggregator: {} - {}", aggregation.provider, aggregation.model)
                    .yellow()
                    .bold(),
                aggregation.aggregated_text.as_deref().unwrap_or_default()
            ));
        } else if let Some(error) = &output.aggregation_error {
            out.push_str(&Self::section_header("Aggregated Response"));
            out.push_str(&format!("\n{} {}\n", "Aggregation failed:".red().bold(), error));
        }

        out.push_str(&Self::footer());
        out
    }

    /// Format any serializable result as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// The aggregated answer, else every answer concatenated
    pub fn format_aggregated_only(output: &ScenarioRunOutput) -> String {
        let mut out = String::new();

        if let Some(text) = output.aggregated_text() {
            out.push_str(text);
        } else {
            if let Some(error) = &output.aggregation_error {
                out.push_str(&format!("{} {}\n\n", "Aggregation failed:".red(), error));
            }
            out.push_str(&merge_responses(
                &output.individual_results,
                MergeMethod::Concatenate,
            ));
        }

        out.push('\n');
        out
    }

    /// Format every per-model result as a labeled section
    pub fn format_results(results: &[InvocationResult]) -> String {
        let mut out = String::new();
        for result in results {
            match result.text() {
                Some(text) => out.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", result.label()).yellow().bold(),
                    text
                )),
                None => out.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {} ──", result.label()).red().bold(),
                    result.error.as_deref().unwrap_or("Unknown")
                )),
            }
        }
        out
    }

    /// Full display of an ad-hoc run
    pub fn format_outcome(outcome: &StrategyOutcome) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("MOA Results"));
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n\n",
            "Strategy:".cyan().bold(),
            outcome.kind()
        ));

        match outcome {
            StrategyOutcome::Parallel { results } | StrategyOutcome::Sequential { results } => {
                out.push_str(&Self::section_header("Individual Responses"));
                out.push_str(&Self::format_results(results));
            }
            StrategyOutcome::Voting(voting) => {
                out.push_str(&Self::section_header("Individual Responses"));
                out.push_str(&Self::format_results(&voting.original_responses));
                out.push_str(&Self::section_header("Voting Result"));
                let mut aggregator = format!(
                    "Aggregator: {} - {}",
                    voting.aggregator_provider, voting.aggregator_model
                );
                if let Some(confidence) = voting.confidence {
                    aggregator.push_str(&format!(" (confidence {}/100)", confidence));
                }
                out.push_str(&format!("\n{}\n\n", aggregator.yellow().bold()));
                match (&voting.aggregated_response, &voting.aggregation_error) {
                    (Some(text), _) => out.push_str(&format!("{}\n", text)),
                    (None, Some(error)) => out.push_str(&format!(
                        "{} {}\n",
                        "Aggregation failed:".red().bold(),
                        error
                    )),
                    (None, None) => {}
                }
            }
            StrategyOutcome::Specialized { roles } => {
                out.push_str(&Self::section_header("Agent Responses"));
                for (role, result) in roles {
                    let title = format!("── {} ({} - {}) ──", role, result.provider, result.model);
                    match result.text() {
                        Some(text) => {
                            out.push_str(&format!("\n{}\n{}\n", title.yellow().bold(), text))
                        }
                        None => out.push_str(&format!(
                            "\n{}\nError: {}\n",
                            title.red().bold(),
                            result.error.as_deref().unwrap_or("Unknown")
                        )),
                    }
                }
            }
        }

        out.push_str(&Self::footer());
        out
    }

    /// Plain-text final answer of an ad-hoc run, ready to display as is.
    ///
    /// Voting shows the verdict as written by the aggregator (or the
    /// failure and the raw answers),
    /// specialized one section per role, parallel every answer, and
    /// sequential the last answer of the chain.
    pub fn format_moa_response(outcome: &StrategyOutcome) -> String {
        match outcome {
            StrategyOutcome::Voting(voting) => match &voting.aggregated_response {
                Some(text) => text.clone(),
                None => format!(
                    "Aggregation failed: {}\n\n{}",
                    voting.aggregation_error.as_deref().unwrap_or("Unknown"),
                    merge_responses(&voting.original_responses, MergeMethod::Concatenate)
                ),
            },
            StrategyOutcome::Specialized { roles } => roles
                .iter()
                .map(|(role, result)| match result.text() {
                    Some(text) => format!("## {}\n\n{}", role, text),
                    None => format!(
                        "## {}\n\nError: {}",
                        role,
                        result.error.as_deref().unwrap_or("Unknown")
                    ),
                })
                .collect::<Vec<_>>()
                .join(RESPONSE_SEPARATOR),
            StrategyOutcome::Parallel { results } => {
                merge_responses(results, MergeMethod::Concatenate)
            }
            StrategyOutcome::Sequential { results } => results
                .iter()
                .rev()
                .find_map(InvocationResult::text)
                .unwrap_or(ALL_FAILED_MESSAGE)
                .to_string(),
        }
    }

    /// Heuristic comparison metrics for a set of answers
    pub fn format_comparison(results: &[InvocationResult]) -> String {
        let mut out = String::new();
        out.push_str(&Self::section_header("Comparison"));

        out.push_str(&format!(
            "\n{} {}%\n",
            "Consensus:".cyan().bold(),
            calculate_consensus(results)
        ));

        match find_best_response(results) {
            Some(best) => out.push_str(&format!(
                "{} {} (score {})\n",
                "Best response:".cyan().bold(),
                best.label(),
                analyze_response(best)
            )),
            None => out.push_str(&format!("{} {}\n", "Best response:".cyan().bold(), ALL_FAILED_MESSAGE)),
        }

        out.push_str(&format!("\n{}\n", "Scores:".cyan().bold()));
        for result in results {
            out.push_str(&format!("  {:>3}  {}\n", analyze_response(result), result.label()));
        }

        let comparison = compare_responses(results);
        if !comparison.agreements.is_empty() {
            out.push_str(&format!("\n{}\n", "Shared terms:".green().bold()));
            out.push_str(&format!(
                "  {}\n",
                comparison
                    .agreements
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        for unique in comparison.unique_points.iter().filter(|u| !u.words.is_empty()) {
            out.push_str(&format!(
                "\n{}\n  {}\n",
                format!("Only {}:", unique.role).yellow().bold(),
                unique
                    .words
                    .iter()
                    .take(MAX_UNIQUE_WORDS)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        out
    }

    /// One line per scenario
    pub fn format_scenario_list(scenarios: &[Scenario]) -> String {
        if scenarios.is_empty() {
            return "No saved scenarios.\n".to_string();
        }

        let mut out = String::new();
        for scenario in scenarios {
            let strategy = scenario
                .strategy
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string());
            out.push_str(&format!(
                "{}  {}  {} model(s){}\n",
                scenario.name.bold(),
                strategy.cyan(),
                scenario.models.len(),
                if scenario.enabled_aggregation().is_some() {
                    ", aggregated"
                } else {
                    ""
                }
            ));
            if !scenario.description.is_empty() {
                out.push_str(&format!("    {}\n", scenario.description.dimmed()));
            }
        }
        out
    }

    /// Detailed view of one scenario
    pub fn format_scenario(scenario: &Scenario) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", "Scenario:".cyan().bold(), scenario.name));
        if !scenario.description.is_empty() {
            out.push_str(&format!("{} {}\n", "Description:".cyan().bold(), scenario.description));
        }
        out.push_str(&format!(
            "{} {}\n",
            "Strategy:".cyan().bold(),
            scenario
                .strategy
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(invalid)".to_string())
        ));

        out.push_str(&format!("\n{}\n", "Models:".cyan().bold()));
        for (i, model) in scenario.models.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} ({} - {})\n",
                i + 1,
                model.role,
                model.provider_label(),
                model.model
            ));
            if let Some(prompt) = model.effective_system_prompt() {
                out.push_str(&format!("{}\n", Self::indent(prompt, "       ").dimmed()));
            }
        }

        match scenario.enabled_aggregation() {
            Some(aggregation) => out.push_str(&format!(
                "\n{} {} - {}\n",
                "Aggregation:".cyan().bold(),
                aggregation
                    .provider
                    .as_ref()
                    .map(|p| p.as_str())
                    .unwrap_or_default(),
                aggregation.model
            )),
            None => out.push_str(&format!("\n{} disabled\n", "Aggregation:".cyan().bold())),
        }

        out
    }

    /// Validation verdict with every error listed
    pub fn format_validation(report: &ValidationReport) -> String {
        if report.is_valid() {
            return format!("{} Scenario is valid\n", "v".green());
        }

        let mut out = format!("{} Scenario is invalid:\n", "x".red());
        for error in &report.errors {
            out.push_str(&format!("  * {}\n", error));
        }
        out
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &ScenarioRunOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &ScenarioRunOutput) -> String {
        Self::format_json(output)
    }

    fn format_aggregated_only(&self, output: &ScenarioRunOutput) -> String {
        Self::format_aggregated_only(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use moa_domain::{
        AggregationResult, ModelInvocationConfig, Provider, RunState, StrategyKind,
        VotingOutcome,
    };
    use std::collections::BTreeMap;

    fn ok(role: &str, text: &str) -> InvocationResult {
        InvocationResult::success(&ModelInvocationConfig::new(role, Provider::OpenAi, "gpt-4"), text)
    }

    fn failed(role: &str, error: &str) -> InvocationResult {
        InvocationResult::failure(
            &ModelInvocationConfig::new(role, Provider::Claude, "claude-3-sonnet"),
            error,
        )
    }

    fn run_output(aggregated: Option<&str>, aggregation_error: Option<&str>) -> ScenarioRunOutput {
        ScenarioRunOutput {
            scenario_name: "Review".to_string(),
            strategy: StrategyKind::Parallel,
            individual_results: vec![ok("Coder", "fn main() {}"), failed("Reviewer", "rate limited")],
            aggregated_result: aggregated
                .map(|text| AggregationResult::new(text, "openai", "gpt-4")),
            aggregation_error: aggregation_error.map(str::to_string),
            state: RunState::Done,
            timestamp: Utc::now(),
        }
    }

    fn voting(aggregated: Option<&str>, confidence: Option<u8>) -> StrategyOutcome {
        StrategyOutcome::Voting(VotingOutcome {
            original_responses: vec![
                ok("A", "Use merge sort."),
                failed("B", "timeout"),
                ok("C", "Use insertion sort."),
            ],
            aggregated_response: aggregated.map(str::to_string),
            aggregation_error: if aggregated.is_none() {
                Some("Request failed: quota".to_string())
            } else {
                None
            },
            confidence,
            aggregator_provider: "openai".to_string(),
            aggregator_model: "gpt-4".to_string(),
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn test_full_format_lists_every_model() {
        let text = ConsoleFormatter::format(&run_output(Some("Combined."), None));
        assert!(text.contains("Coder (openai - gpt-4)"));
        assert!(text.contains("Error: rate limited"));
        assert!(text.contains("Combined."));
    }

    #[test]
    fn test_full_format_shows_aggregation_failure() {
        let text = ConsoleFormatter::format(&run_output(None, Some("Aggregation failed: quota")));
        assert!(text.contains("quota"));
        assert!(text.contains("fn main() {}"));
    }

    #[test]
    fn test_aggregated_only_prefers_aggregation() {
        let text = ConsoleFormatter::format_aggregated_only(&run_output(Some("Combined."), None));
        assert_eq!(text, "Combined.\n");
    }

    #[test]
    fn test_aggregated_only_single_success_is_verbatim() {
        let text = ConsoleFormatter::format_aggregated_only(&run_output(None, None));
        assert_eq!(text, "fn main() {}\n");
    }

    #[test]
    fn test_aggregated_only_falls_back_to_merge() {
        let mut output = run_output(None, None);
        output.individual_results = vec![
            ok("Coder", "fn main() {}"),
            failed("Reviewer", "rate limited"),
            ok("Tester", "#[test] fn it_works() {}"),
        ];
        let text = ConsoleFormatter::format_aggregated_only(&output);
        assert!(text.contains("## Coder (openai):\n\nfn main() {}"));
        assert!(text.contains("## Tester (openai):"));
        assert!(!text.contains("Reviewer"));
    }

    #[test]
    fn test_json_format_is_parseable() {
        let text = ConsoleFormatter::format_json(&run_output(Some("Combined."), None));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["scenarioName"], "Review");
        assert_eq!(value["individualResults"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let output = run_output(Some("Combined."), None);
        let rendered = ConsoleFormatter.render(&output, moa_domain::OutputFormat::Aggregated);
        assert_eq!(rendered, "Combined.\n");
    }

    #[test]
    fn test_moa_response_voting_with_one_failure() {
        let verdict = "Merge sort wins.\n\nConfidence: 80/100";
        let text = ConsoleFormatter::format_moa_response(&voting(Some(verdict), Some(80)));
        assert_eq!(text, verdict);
        assert_eq!(text.matches("Confidence").count(), 1);
    }

    #[test]
    fn test_outcome_shows_parsed_confidence_once() {
        let verdict = "Merge sort wins.\n\nConfidence: 80/100";
        let text = ConsoleFormatter::format_outcome(&voting(Some(verdict), Some(80)));
        assert!(text.contains("Aggregator: openai - gpt-4 (confidence 80/100)"));
        assert_eq!(text.matches("Confidence: 80/100").count(), 1);
    }

    #[test]
    fn test_moa_response_voting_aggregator_failed() {
        let text = ConsoleFormatter::format_moa_response(&voting(None, None));
        assert!(text.starts_with("Aggregation failed: Request failed: quota"));
        assert!(text.contains("Use merge sort."));
        assert!(text.contains("Use insertion sort."));
    }

    #[test]
    fn test_moa_response_specialized() {
        let mut roles = BTreeMap::new();
        roles.insert("coder".to_string(), ok("Coder", "code"));
        roles.insert("tester".to_string(), failed("Tester", "boom"));
        let text = ConsoleFormatter::format_moa_response(&StrategyOutcome::Specialized { roles });
        assert_eq!(text, "## coder\n\ncode\n\n---\n\n## tester\n\nError: boom");
    }

    #[test]
    fn test_moa_response_sequential_takes_last_answer() {
        let outcome = StrategyOutcome::Sequential {
            results: vec![ok("Draft", "first"), ok("Polish", "final")],
        };
        assert_eq!(ConsoleFormatter::format_moa_response(&outcome), "final");

        let failed_chain = StrategyOutcome::Sequential {
            results: vec![failed("Draft", "boom")],
        };
        assert_eq!(
            ConsoleFormatter::format_moa_response(&failed_chain),
            ALL_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_outcome_format_shows_confidence() {
        let text = ConsoleFormatter::format_outcome(&voting(Some("Merge sort wins."), Some(80)));
        assert!(text.contains("Merge sort wins."));
        assert!(text.contains("80%"));
        assert!(text.contains("Error: timeout"));
    }

    #[test]
    fn test_comparison_reports_metrics() {
        let results = vec![
            ok("A", "Rust ownership prevents memory errors at compile time."),
            ok("B", "Ownership rules prevent memory errors before runtime."),
            failed("C", "timeout"),
        ];
        let text = ConsoleFormatter::format_comparison(&results);
        assert!(text.contains("Consensus:"));
        assert!(text.contains("Best response:"));
        assert!(text.contains("memory"));
        assert!(text.contains("ownership"));
    }

    #[test]
    fn test_validation_lists_errors() {
        let report = ValidationReport::from_errors(vec![
            "Scenario name is required".to_string(),
            "At least one model is required".to_string(),
        ]);
        let text = ConsoleFormatter::format_validation(&report);
        assert!(text.contains("  * Scenario name is required\n"));
        assert!(text.contains("  * At least one model is required\n"));
    }

    #[test]
    fn test_scenario_list() {
        assert_eq!(ConsoleFormatter::format_scenario_list(&[]), "No saved scenarios.\n");
        let text = ConsoleFormatter::format_scenario_list(&[Scenario::default_template()]);
        assert!(text.contains("New Scenario"));
        assert!(text.contains("1 model(s)"));
    }

    #[test]
    fn test_scenario_detail() {
        let text = ConsoleFormatter::format_scenario(&Scenario::default_template());
        assert!(text.contains("1. Assistant (openai - gpt-3.5-turbo)"));
        assert!(text.contains("disabled"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
