//! Aggregation domain
//!
//! Combining several model outputs into one answer, either through a
//! designated aggregator model (configured here, executed by the
//! application layer) or through deterministic text heuristics.

pub mod entities;
pub mod heuristics;
pub mod parsing;

pub use entities::{
    AGGREGATOR_ROLE, AggregationConfig, AggregationResult, DEFAULT_AGGREGATION_INSTRUCTION,
};
pub use heuristics::{
    ALL_FAILED_MESSAGE, MergeMethod, ResponseComparison, UniquePoints, analyze_response,
    calculate_consensus, compare_responses, find_best_response, merge_responses,
    simple_aggregation,
};
pub use parsing::parse_confidence_score;
