use crate::models::{Record, ScoredRecord};
use crate::normalize::scoring_tokens;
use crate::traits::RelevanceScorer;
use std::collections::HashSet;

const EXACT_MATCH_WEIGHT: f64 = 3.0;
const PARTIAL_MATCH_WEIGHT: f64 = 1.0;

/// Upper bound of any [`OverlapScorer`] score.
pub const MAX_SCORE: f64 = EXACT_MATCH_WEIGHT;

/// Token-overlap relevance with partial credit for substring matches.
///
/// Each query token of three or more characters earns 3 when the record has
/// the same token, 1 when some record token contains it or is contained by it,
/// and 0 otherwise. The score is the mean over those query tokens, so it
/// always falls in `[0, 3]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapScorer;

impl OverlapScorer {
    pub fn score_tokens(query_tokens: &[String], record_tokens: &HashSet<String>) -> f64 {
        if query_tokens.is_empty() {
            return 0.0;
        }

        let weight: f64 = query_tokens
            .iter()
            .map(|token| {
                if record_tokens.contains(token) {
                    EXACT_MATCH_WEIGHT
                } else if record_tokens.iter().any(|candidate| {
                    candidate.contains(token.as_str()) || token.contains(candidate.as_str())
                }) {
                    PARTIAL_MATCH_WEIGHT
                } else {
                    0.0
                }
            })
            .sum();

        weight / query_tokens.len() as f64
    }
}

impl RelevanceScorer for OverlapScorer {
    fn score(&self, query: &str, record: &Record) -> f64 {
        let query_tokens = scoring_tokens(query);
        let record_tokens: HashSet<String> = scoring_tokens(&record_projection(record))
            .into_iter()
            .collect();
        Self::score_tokens(&query_tokens, &record_tokens)
    }
}

/// The text of a record that takes part in lexical matching.
pub fn record_projection(record: &Record) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(record.text.as_deref());
    parts.extend(record.title.as_deref());
    parts.extend(record.skills.iter().map(String::as_str));
    parts.extend(record.location.as_deref());
    parts.extend(record.company.as_deref());
    parts.join(" ")
}

/// Scores every record against `query`, keeping collection order.
pub fn score_records<S: RelevanceScorer + ?Sized>(
    scorer: &S,
    query: &str,
    records: &[Record],
) -> Vec<ScoredRecord> {
    records
        .iter()
        .enumerate()
        .map(|(original_index, record)| ScoredRecord {
            original_index,
            score: scorer.score(query, record),
            record: record.clone(),
        })
        .collect()
}

/// Drops zero scores and orders the rest by descending score; ties keep collection order.
pub fn rank(mut scored: Vec<ScoredRecord>) -> Vec<ScoredRecord> {
    scored.retain(|candidate| candidate.score > 0.0);
    scored.sort_by(|left, right| right.score.total_cmp(&left.score));
    scored
}
