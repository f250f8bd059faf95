use crate::grammar::TaggedToken;
use crate::Record;

pub trait Tagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

pub trait RelevanceScorer {
    /// Relative relevance of `record` to the raw `query`; `0.0` means no overlap.
    fn score(&self, query: &str, record: &Record) -> f64;
}
