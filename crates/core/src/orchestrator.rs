use crate::cascade;
use crate::extractor::FilterExtractor;
use crate::scorer::{rank, score_records, OverlapScorer};
use crate::tagger::LexiconTagger;
use crate::traits::{RelevanceScorer, Tagger};
use crate::vocabulary::Vocabulary;
use crate::{
    CombinedResult, FilterSet, Record, ScoredRecord, SearchRequest, SearchResult, SearchScope,
};
use std::sync::Arc;
use tracing::debug;

/// Score given to every record when filters are applied without a query.
pub const UNRANKED_SCORE: f64 = 1.0;

/// Composes filter extraction, lexical scoring and the strict cascade.
///
/// Holds only immutable tables, so one matcher can serve concurrent callers.
pub struct HybridMatcher<T = LexiconTagger, S = OverlapScorer>
where
    T: Tagger,
    S: RelevanceScorer,
{
    extractor: FilterExtractor<T>,
    scorer: S,
}

impl HybridMatcher<LexiconTagger, OverlapScorer> {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self::with_parts(FilterExtractor::new(Arc::new(vocabulary)), OverlapScorer)
    }
}

impl Default for HybridMatcher<LexiconTagger, OverlapScorer> {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

impl<T, S> HybridMatcher<T, S>
where
    T: Tagger,
    S: RelevanceScorer,
{
    pub fn with_parts(extractor: FilterExtractor<T>, scorer: S) -> Self {
        Self { extractor, scorer }
    }

    pub fn extractor(&self) -> &FilterExtractor<T> {
        &self.extractor
    }

    pub fn extract_filters(&self, query: &str) -> FilterSet {
        self.extractor.extract(query)
    }

    /// Extracts filters from `query`, ranks `records` lexically and keeps the
    /// ones passing every extracted constraint, truncated to `top_k`.
    pub fn hybrid_search(&self, query: &str, records: &[Record], top_k: usize) -> SearchResult {
        let filters = self.extractor.extract(query);
        let ranked = rank(score_records(&self.scorer, query, records));
        let top_score = ranked.first().map(|hit| hit.score).unwrap_or(0.0);

        let passing = cascade::apply_strict_filters(ranked, &filters);
        debug!(
            records = records.len(),
            passing = passing.len(),
            top_score,
            top_k,
            "hybrid search"
        );

        truncated(passing, filters, top_score, top_k)
    }

    /// Applies caller-supplied filters to an already scored list.
    pub fn apply_strict_filters(
        &self,
        scored: Vec<ScoredRecord>,
        filters: &FilterSet,
    ) -> Vec<ScoredRecord> {
        cascade::apply_strict_filters(scored, filters)
    }

    /// Filters `records` without ranking; every survivor scores [`UNRANKED_SCORE`].
    pub fn filter_records(&self, records: &[Record], filters: &FilterSet, top_k: usize) -> SearchResult {
        let top_score = if records.is_empty() { 0.0 } else { UNRANKED_SCORE };
        let passing = cascade::apply_strict_filters(
            ScoredRecord::uniform(records, UNRANKED_SCORE),
            filters,
        );
        truncated(passing, filters.clone(), top_score, top_k)
    }

    /// Query text goes through [`hybrid_search`](Self::hybrid_search); a blank
    /// query falls back to the request's explicit filters.
    pub fn run(&self, request: &SearchRequest, records: &[Record]) -> SearchResult {
        if request.has_query() {
            self.hybrid_search(&request.query, records, request.top_k)
        } else {
            self.filter_records(records, &request.filters, request.top_k)
        }
    }

    /// Runs `request` separately over the jobs and the candidates in `records`.
    ///
    /// Records of unknown kind belong to neither side. `original_index` in the
    /// results still points into `records`.
    pub fn search_collections(
        &self,
        request: &SearchRequest,
        records: &[Record],
        scope: SearchScope,
    ) -> CombinedResult {
        let side = |wanted: SearchScope| {
            if scope != SearchScope::Both && scope != wanted {
                return None;
            }

            let (positions, subset): (Vec<usize>, Vec<Record>) = records
                .iter()
                .enumerate()
                .filter(|(_, record)| wanted.includes(record.kind))
                .map(|(position, record)| (position, record.clone()))
                .unzip();

            let mut result = self.run(request, &subset);
            for hit in &mut result.results {
                hit.original_index = positions[hit.original_index];
            }
            Some(result)
        };

        CombinedResult {
            jobs: side(SearchScope::Jobs),
            candidates: side(SearchScope::Candidates),
        }
    }
}

fn truncated(
    mut passing: Vec<ScoredRecord>,
    filters: FilterSet,
    top_score: f64,
    top_k: usize,
) -> SearchResult {
    let total_found = passing.len();
    passing.truncate(top_k);

    SearchResult {
        results: passing,
        filters,
        total_found,
        top_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, RecordKind};
    use crate::scorer::MAX_SCORE;

    fn matcher() -> HybridMatcher {
        HybridMatcher::default()
    }

    fn python_in_bangalore() -> Record {
        Record {
            id: "asha".to_string(),
            kind: RecordKind::Candidate,
            title: Some("Asha".to_string()),
            skills: vec!["Python".to_string()],
            location: Some("Bangalore, Karnataka".to_string()),
            experience_years: Some(4),
            ..Record::default()
        }
    }

    fn java_in_mumbai() -> Record {
        Record {
            id: "ravi".to_string(),
            kind: RecordKind::Candidate,
            title: Some("Ravi".to_string()),
            skills: vec!["Java".to_string()],
            location: Some("Mumbai".to_string()),
            experience_years: Some(2),
            ..Record::default()
        }
    }

    fn frontend_job(id: &str, remote: bool) -> Record {
        Record {
            id: id.to_string(),
            kind: RecordKind::Job,
            title: Some("Frontend Developer".to_string()),
            text: Some("Remote frontend roles building React interfaces".to_string()),
            company: Some("Pixel Works".to_string()),
            skills: vec!["React".to_string(), "CSS".to_string()],
            location: Some("Pune".to_string()),
            remote: Some(remote),
            ..Record::default()
        }
    }

    #[test]
    fn scenario_python_developers_in_bangalore() {
        let matcher = matcher();
        let records = vec![python_in_bangalore(), java_in_mumbai()];

        let result = matcher.hybrid_search(
            "Python developers in Bangalore with 3 years experience",
            &records,
            10,
        );

        assert_eq!(result.filters.skills, Some(vec!["python".to_string()]));
        assert_eq!(result.filters.location.as_deref(), Some("Bangalore"));
        assert_eq!(result.filters.experience, Some(3));
        assert_eq!(result.total_found, 1);
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].record.id, "asha");
        assert_eq!(result.results[0].original_index, 0);
        assert!(result.top_score > 0.0);
    }

    #[test]
    fn scenario_remote_query_excludes_office_roles() {
        let matcher = matcher();
        let records = vec![frontend_job("office", false)];

        let result = matcher.hybrid_search("remote frontend roles", &records, 10);

        assert_eq!(result.filters.remote, Some(true));
        assert!(result.top_score > 0.0, "the record is lexically relevant");
        assert_eq!(result.total_found, 0);
        assert!(result.results.is_empty());
    }

    #[test]
    fn scenario_zero_top_k_still_counts_matches() {
        let matcher = matcher();
        let records: Vec<Record> = (0..5)
            .map(|index| frontend_job(&format!("job-{index}"), true))
            .collect();

        let result = matcher.hybrid_search("remote frontend roles", &records, 0);

        assert!(result.results.is_empty());
        assert_eq!(result.total_found, 5);
    }

    #[test]
    fn empty_inputs_are_safe() {
        let matcher = matcher();
        let result = matcher.hybrid_search("", &[], 10);

        assert!(result.results.is_empty());
        assert_eq!(result.total_found, 0);
        assert_eq!(result.top_score, 0.0);
        assert_eq!(result.filters, FilterSet::default());
    }

    #[test]
    fn zero_scores_never_reach_the_cascade() {
        let matcher = matcher();
        let records = vec![python_in_bangalore(), java_in_mumbai()];

        let result = matcher.hybrid_search("kubernetes operators", &records, 10);

        assert_eq!(result.total_found, 0);
        assert_eq!(result.top_score, 0.0);
    }

    #[test]
    fn company_or_product_names_do_not_become_locations() {
        let matcher = matcher();
        let blockchain_in = |id: &str, place: &str| Record {
            id: id.to_string(),
            kind: RecordKind::Candidate,
            title: Some(id.to_string()),
            skills: vec!["Blockchain".to_string()],
            location: Some(place.to_string()),
            ..Record::default()
        };
        let records = vec![
            blockchain_in("kavya", "Pune, Maharashtra"),
            blockchain_in("imran", "Mumbai"),
        ];

        let result = matcher.hybrid_search("Hiring for Blockchain developers in Pune", &records, 10);

        assert_eq!(result.filters.location.as_deref(), Some("Pune"));
        assert_eq!(result.total_found, 1);
        assert_eq!(result.results[0].record.id, "kavya");
    }

    #[test]
    fn results_are_truncated_in_descending_score_order() {
        let matcher = matcher();
        let records = vec![
            Record { id: "weak".into(), text: Some("ledgers audit".into()), ..Record::default() },
            Record { id: "strong".into(), text: Some("ledger reconciliation".into()), ..Record::default() },
            Record {
                id: "also-strong".into(),
                text: Some("monthly ledger reconciliation".into()),
                ..Record::default()
            },
        ];

        let result = matcher.hybrid_search("ledger reconciliation", &records, 2);
        let ids: Vec<_> = result.results.iter().map(|hit| hit.record.id.as_str()).collect();

        assert_eq!(ids, vec!["strong", "also-strong"]);
        assert_eq!(result.total_found, 3);
        assert_eq!(result.top_score, MAX_SCORE);
    }

    #[test]
    fn identical_calls_give_identical_results() {
        let matcher = matcher();
        let records = vec![
            python_in_bangalore(),
            java_in_mumbai(),
            frontend_job("a", true),
            frontend_job("b", false),
        ];

        for query in ["python developers", "remote frontend roles", "java in Mumbai", ""] {
            let first = matcher.hybrid_search(query, &records, 3);
            let second = matcher.hybrid_search(query, &records, 3);
            assert_eq!(first, second, "query {query:?}");
        }
    }

    #[test]
    fn explicit_filters_bypass_extraction() {
        let matcher = matcher();
        let records = vec![python_in_bangalore(), java_in_mumbai()];
        let filters = FilterSet {
            location: Some("mumbai".to_string()),
            ..FilterSet::default()
        };

        let kept = matcher.apply_strict_filters(ScoredRecord::uniform(&records, 1.0), &filters);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].record.id, "ravi");
        assert_eq!(kept[0].original_index, 1);
    }

    #[test]
    fn blank_query_requests_use_explicit_filters() {
        let matcher = matcher();
        let mut graduate = python_in_bangalore();
        graduate.education = vec![Education {
            level: Some("Bachelors".to_string()),
            field: None,
            institution: Some("NIT Surathkal".to_string()),
        }];
        let records = vec![graduate, java_in_mumbai()];
        let request = SearchRequest {
            query: "   ".to_string(),
            filters: FilterSet {
                institution: Some("nit".to_string()),
                ..FilterSet::default()
            },
            top_k: 10,
        };

        let result = matcher.run(&request, &records);

        assert_eq!(result.total_found, 1);
        assert_eq!(result.results[0].score, UNRANKED_SCORE);
        assert_eq!(result.top_score, UNRANKED_SCORE);
        assert_eq!(result.filters, request.filters);
    }

    #[test]
    fn collections_are_searched_per_kind() {
        let matcher = matcher();
        let records = vec![
            frontend_job("job-1", true),
            python_in_bangalore(),
            Record { id: "loose".into(), text: Some("react".into()), ..Record::default() },
            frontend_job("job-2", true),
        ];
        let request = SearchRequest {
            query: "react".to_string(),
            filters: FilterSet::default(),
            top_k: 10,
        };

        let both = matcher.search_collections(&request, &records, SearchScope::Both);
        let jobs = both.jobs.expect("jobs side requested");
        let candidates = both.candidates.expect("candidates side requested");

        let job_positions: Vec<_> = jobs.results.iter().map(|hit| hit.original_index).collect();
        assert_eq!(job_positions, vec![0, 3]);
        assert_eq!(candidates.total_found, 0);

        let only_jobs = matcher.search_collections(&request, &records, SearchScope::Jobs);
        assert!(only_jobs.jobs.is_some());
        assert!(only_jobs.candidates.is_none());
    }
}
