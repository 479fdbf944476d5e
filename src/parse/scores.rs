//! Numeric score extraction from a mastery section.
//!
//! The evaluation prompt asks for `Label: <1-5>` lines, but the model is
//! free to decorate them. Anything of the form `": N"` anywhere in the body
//! counts as a score; the set is transient and only feeds the average.

use regex::Regex;

/// Extract every integer following a literal `": "` in the body, in order.
pub fn extract_scores(body: &str) -> Vec<u32> {
    let re = Regex::new(r": (\d+)").unwrap();
    re.captures_iter(body)
        .filter_map(|captures| captures.get(1)?.as_str().parse().ok())
        .collect()
}

/// Average of a score set; an empty set defaults to the neutral 3.
pub fn average_score(scores: &[u32]) -> f64 {
    if scores.is_empty() {
        return 3.0;
    }
    scores.iter().sum::<u32>() as f64 / scores.len() as f64
}
