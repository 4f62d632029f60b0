//! Confidence score extraction from aggregator prose.
//!
//! The voting aggregator is asked to state a 0-100 confidence score, but it
//! answers in free text. The score is extracted best-effort; the raw text is
//! always kept as the authoritative answer.

/// Find the confidence score a voting aggregator wrote into its answer.
///
/// Looks for the word "confidence" (any case) and takes the first integer
/// that follows it within the same line. Values above 100 are rejected.
///
/// # Examples
///
/// ```
/// use moa_domain::aggregation::parse_confidence_score;
///
/// assert_eq!(parse_confidence_score("**Confidence**: 85/100"), Some(85));
/// assert_eq!(parse_confidence_score("Confidence score: 72%"), Some(72));
/// assert_eq!(parse_confidence_score("No score here"), None);
/// ```
pub fn parse_confidence_score(text: &str) -> Option<u8> {
    text.lines().find_map(|line| {
        let lower = line.to_lowercase();
        let start = lower.find("confidence")? + "confidence".len();
        let digits: String = lower[start..]
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse::<u8>().ok().filter(|score| *score <= 100)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_format() {
        assert_eq!(parse_confidence_score("Confidence: 90/100"), Some(90));
    }

    #[test]
    fn test_heading_then_later_line() {
        let text = "## Best Answer\nUse iterators.\n\n## Confidence\nConfidence: 64/100";
        assert_eq!(parse_confidence_score(text), Some(64));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(parse_confidence_score("confidence 250"), None);
    }

    #[test]
    fn test_missing_number() {
        assert_eq!(parse_confidence_score("I have high confidence."), None);
    }
}
