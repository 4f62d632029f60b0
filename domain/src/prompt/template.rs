//! Prompt templates for the MOA strategies

use crate::invocation::result::InvocationResult;

/// Separator between rendered model responses
pub const RESPONSE_SEPARATOR: &str = "\n\n---\n\n";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Context handed to step *i+1* of a sequential chain
    pub fn sequential_context(role: &str, response: &str) -> String {
        format!(
            "Previous step ({}):\n{}\n\nNow complete your task based on this.",
            role, response
        )
    }

    /// User prompt for a specialized agent: its own instructions, then the shared prompt
    pub fn specialized_prompt(system_prompt: Option<&str>, prompt: &str) -> String {
        match system_prompt.filter(|s| !s.trim().is_empty()) {
            Some(system) => format!("{}\n\n{}", system, prompt),
            None => prompt.to_string(),
        }
    }

    /// Render responses as numbered, labeled sections
    fn render_responses(results: &[&InvocationResult]) -> String {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "### Response {}: {}\n{}",
                    i + 1,
                    r.label(),
                    r.response.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join(RESPONSE_SEPARATOR)
    }

    /// Prompt sent to a scenario's aggregation model
    pub fn aggregation_prompt(
        instruction: &str,
        question: &str,
        results: &[&InvocationResult],
    ) -> String {
        format!(
            r#"{}

Original User Query:
{}

Individual Model Responses:

{}

Please provide a final, consolidated answer that takes the best from all responses:"#,
            instruction,
            question,
            Self::render_responses(results)
        )
    }

    /// Prompt sent to the aggregator of a voting run
    pub fn voting_prompt(question: &str, results: &[&InvocationResult]) -> String {
        format!(
            r#"Several AI models answered the same question independently. Act as the judge.

Original User Query:
{}

Model Responses:

{}

Based on the responses above, please provide:

1. **Best Answer**: The best combined answer, taking the strongest elements from all responses

2. **Most Reliable**: Which model(s) gave the most reliable response, and why

3. **Contradictions**: Any points where the responses contradict each other, and which side is better supported

4. **Confidence**: Your confidence in the final answer as a score from 0 to 100, written as "Confidence: <score>/100"

Format your response with clear markdown headers."#,
            question,
            Self::render_responses(results)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::config::ModelInvocationConfig;
    use crate::providers::Provider;

    fn result(role: &str, text: &str) -> InvocationResult {
        InvocationResult::success(
            &ModelInvocationConfig::new(role, Provider::OpenAi, "gpt-4"),
            text,
        )
    }

    #[test]
    fn test_sequential_context_format() {
        let context = PromptTemplate::sequential_context("Coder", "fn main() {}");
        assert_eq!(
            context,
            "Previous step (Coder):\nfn main() {}\n\nNow complete your task based on this."
        );
    }

    #[test]
    fn test_specialized_prompt() {
        assert_eq!(
            PromptTemplate::specialized_prompt(Some("You test code."), "Add tests"),
            "You test code.\n\nAdd tests"
        );
        assert_eq!(PromptTemplate::specialized_prompt(None, "Add tests"), "Add tests");
        assert_eq!(PromptTemplate::specialized_prompt(Some(""), "Add tests"), "Add tests");
    }

    #[test]
    fn test_aggregation_prompt_sections() {
        let a = result("Coder", "first answer");
        let b = result("Reviewer", "second answer");
        let prompt = PromptTemplate::aggregation_prompt("Merge:", "What is Rust?", &[&a, &b]);
        assert!(prompt.starts_with("Merge:"));
        assert!(prompt.contains("Original User Query:\nWhat is Rust?"));
        assert!(prompt.contains("### Response 1: Coder (openai - gpt-4)\nfirst answer"));
        assert!(prompt.contains("---"));
        assert!(prompt.contains("### Response 2: Reviewer"));
    }

    #[test]
    fn test_voting_prompt_asks_for_confidence() {
        let a = result("A", "yes");
        let prompt = PromptTemplate::voting_prompt("Is it safe?", &[&a]);
        assert!(prompt.contains("Is it safe?"));
        assert!(prompt.contains("Most Reliable"));
        assert!(prompt.contains("Contradictions"));
        assert!(prompt.contains("0 to 100"));
    }
}
