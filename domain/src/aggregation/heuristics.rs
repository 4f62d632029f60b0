//! Deterministic, non-AI response comparison.
//!
//! These functions feed UI metrics (best response, agreement, consensus).
//! They are lexical heuristics, not correctness oracles: the consensus
//! score in particular measures word overlap, not semantic similarity.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`analyze_response`] | 0-100 quality score for one response |
//! | [`find_best_response`] | highest-scoring successful response |
//! | [`merge_responses`] | concatenate / best / summary merge |
//! | [`compare_responses`] | shared and unique long words |
//! | [`calculate_consensus`] | 0-100 lexical agreement score |
//! | [`simple_aggregation`] | concatenation packaged as an aggregation result |

use super::entities::AggregationResult;
use crate::invocation::result::{InvocationResult, successful};
use crate::prompt::RESPONSE_SEPARATOR;
use crate::util::truncate_chars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Shown when no model produced an answer
pub const ALL_FAILED_MESSAGE: &str = "All models failed to respond.";

/// Words shorter than or equal to this are ignored by the comparison
const MIN_WORD_LEN: usize = 5;

/// Length of a digest line in summary merges
const SUMMARY_DIGEST_CHARS: usize = 100;

/// Heuristic quality score (0-100) of a single response.
///
/// Starts at `min(100, chars / 10)`, then adds 15 for code (a fenced block
/// or the keywords `function` / `class`), 10 for list or heading markers,
/// and 10 for responses longer than 500 characters. Failed results score 0.
pub fn analyze_response(result: &InvocationResult) -> u32 {
    let Some(text) = result.text() else {
        return 0;
    };

    let length = text.chars().count();
    let mut score = (length / 10).min(100) as u32;

    if text.contains("```") || text.contains("function") || text.contains("class") {
        score += 15;
    }
    if has_structure_markers(text) {
        score += 10;
    }
    if length > 500 {
        score += 10;
    }

    score.min(100)
}

fn has_structure_markers(text: &str) -> bool {
    text.lines().map(str::trim_start).any(|line| {
        line.starts_with('#')
            || line.starts_with("- ")
            || line.starts_with("* ")
            || line
                .split_once(". ")
                .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    })
}

/// The successful response with the highest heuristic score.
///
/// Ties go to the earliest result.
pub fn find_best_response(results: &[InvocationResult]) -> Option<&InvocationResult> {
    successful(results).fold(None, |best: Option<(&InvocationResult, u32)>, r| {
        let score = analyze_response(r);
        match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((r, score)),
        }
    })
    .map(|(r, _)| r)
}

/// How [`merge_responses`] combines answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Every success with a header, separated by rules
    #[default]
    Concatenate,
    /// Only the highest-scoring success
    Best,
    /// One truncated line per model
    Summary,
}

impl std::str::FromStr for MergeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concatenate" => Ok(MergeMethod::Concatenate),
            "best" => Ok(MergeMethod::Best),
            "summary" => Ok(MergeMethod::Summary),
            other => Err(format!("Unknown merge method: {}", other)),
        }
    }
}

/// Merge results into one displayable string.
///
/// Never fails: with no successes this returns [`ALL_FAILED_MESSAGE`], and a
/// single success is returned verbatim whatever the method.
pub fn merge_responses(results: &[InvocationResult], method: MergeMethod) -> String {
    let successes: Vec<&InvocationResult> = successful(results).collect();

    match successes.as_slice() {
        [] => return ALL_FAILED_MESSAGE.to_string(),
        [only] => return only.text().unwrap_or_default().to_string(),
        _ => {}
    }

    match method {
        MergeMethod::Concatenate => concatenate(&successes),
        MergeMethod::Best => find_best_response(results)
            .and_then(InvocationResult::text)
            .unwrap_or(ALL_FAILED_MESSAGE)
            .to_string(),
        MergeMethod::Summary => successes
            .iter()
            .map(|r| {
                let first_line = r.text().unwrap_or_default().lines().next().unwrap_or("");
                format!(
                    "{} ({}): {}",
                    r.role,
                    r.provider,
                    truncate_chars(first_line.trim(), SUMMARY_DIGEST_CHARS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn concatenate(successes: &[&InvocationResult]) -> String {
    successes
        .iter()
        .map(|r| {
            format!(
                "## {} ({}):\n\n{}",
                r.role,
                r.provider,
                r.text().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join(RESPONSE_SEPARATOR)
}

/// Words only one response used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquePoints {
    pub role: String,
    pub words: BTreeSet<String>,
}

/// Lexical comparison across successful responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseComparison {
    /// Words present in every response
    pub agreements: BTreeSet<String>,
    /// Per response (input order), words absent from all others
    pub unique_points: Vec<UniquePoints>,
}

fn significant_words(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > MIN_WORD_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Compare successful responses word by word.
///
/// Needs at least two successes; otherwise both sets are empty.
pub fn compare_responses(results: &[InvocationResult]) -> ResponseComparison {
    let successes: Vec<&InvocationResult> = successful(results).collect();
    if successes.len() < 2 {
        return ResponseComparison::default();
    }

    let word_sets: Vec<BTreeSet<String>> = successes
        .iter()
        .map(|r| significant_words(r.text().unwrap_or_default()))
        .collect();

    let agreements = word_sets
        .iter()
        .skip(1)
        .fold(word_sets[0].clone(), |acc, words| {
            acc.intersection(words).cloned().collect()
        });

    let unique_points = successes
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let words = word_sets[i]
                .iter()
                .filter(|w| {
                    word_sets
                        .iter()
                        .enumerate()
                        .all(|(j, other)| j == i || !other.contains(*w))
                })
                .cloned()
                .collect();
            UniquePoints {
                role: r.role.clone(),
                words,
            }
        })
        .collect();

    ResponseComparison {
        agreements,
        unique_points,
    }
}

/// Approximate agreement score (0-100).
///
/// `|agreements| / max(1, average unique words per response)`, scaled by 50
/// and clamped to 100. Zero with fewer than two successful responses.
pub fn calculate_consensus(results: &[InvocationResult]) -> u32 {
    let comparison = compare_responses(results);
    if comparison.unique_points.len() < 2 {
        return 0;
    }

    let total_unique: usize = comparison.unique_points.iter().map(|u| u.words.len()).sum();
    let avg_unique = total_unique as f64 / comparison.unique_points.len() as f64;
    let ratio = comparison.agreements.len() as f64 / avg_unique.max(1.0);

    (ratio * 50.0).round().min(100.0) as u32
}

/// Mechanical aggregation: every success concatenated under a header.
pub fn simple_aggregation(results: &[InvocationResult]) -> AggregationResult {
    let successes: Vec<&InvocationResult> = successful(results).collect();
    let text = if successes.is_empty() {
        ALL_FAILED_MESSAGE.to_string()
    } else {
        concatenate(&successes)
    };
    AggregationResult::new(text, "simple", "text-concatenation")
}
