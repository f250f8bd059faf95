pub mod cascade;
pub mod error;
pub mod extractor;
pub mod grammar;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod records;
pub mod scorer;
pub mod suggest;
pub mod tagger;
pub mod traits;
pub mod vocabulary;

pub use cascade::apply_strict_filters;
pub use error::{MatchError, Result};
pub use extractor::FilterExtractor;
pub use grammar::{match_template, Category, Pos, Rule, Slot, TaggedToken, Template, TemplateMatch};
pub use ingest::{discover_record_files, load_records, LoadReport, RecordCollection, SkippedFile};
pub use models::{
    CombinedResult, Education, FilterSet, Record, RecordKind, ScoredRecord, SearchRequest,
    SearchResult, SearchScope, Suggestion,
};
pub use normalize::{normalize, tokenize};
pub use orchestrator::{HybridMatcher, UNRANKED_SCORE};
pub use scorer::{OverlapScorer, MAX_SCORE};
pub use suggest::{suggestions, DEFAULT_SUGGESTION_LIMIT};
pub use tagger::LexiconTagger;
pub use traits::{RelevanceScorer, Tagger};
pub use vocabulary::Vocabulary;
