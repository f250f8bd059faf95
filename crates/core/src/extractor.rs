use crate::grammar::{match_template, rules_for, Category, Rule, TaggedToken};
use crate::models::FilterSet;
use crate::tagger::{number_value, LexiconTagger};
use crate::traits::Tagger;
use crate::vocabulary::Vocabulary;
use std::sync::Arc;
use tracing::debug;

/// Turns a free-text query into a [`FilterSet`].
///
/// Rules run in table order. Skills accumulate across every skill rule
/// (deduplicated, first occurrence wins the position); every other category
/// keeps the first value a rule produces. Extraction never fails: a query with
/// no recognizable pattern yields an empty filter set.
#[derive(Debug, Clone)]
pub struct FilterExtractor<T = LexiconTagger> {
    tagger: T,
    rules: Vec<Rule>,
    vocabulary: Arc<Vocabulary>,
}

impl FilterExtractor<LexiconTagger> {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        let tagger = LexiconTagger::new(Arc::clone(&vocabulary));
        Self::with_tagger(tagger, vocabulary)
    }
}

impl Default for FilterExtractor<LexiconTagger> {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl<T: Tagger> FilterExtractor<T> {
    pub fn with_tagger(tagger: T, vocabulary: Arc<Vocabulary>) -> Self {
        let rules = rules_for(&vocabulary);
        Self {
            tagger,
            rules,
            vocabulary,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn extract(&self, query: &str) -> FilterSet {
        let tokens = self.tagger.tag(query);
        let filters = self.extract_tagged(&tokens);
        debug!(query, constraints = ?filters.active_constraints(), "extracted filters");
        filters
    }

    pub fn extract_tagged(&self, tokens: &[TaggedToken]) -> FilterSet {
        let mut filters = FilterSet::default();
        let mut skills: Vec<String> = Vec::new();

        for rule in &self.rules {
            let capture = rule.template.capture;
            for found in match_template(tokens, &rule.template) {
                let captured = found.slot_tokens(tokens, capture);
                if captured.is_empty() {
                    continue;
                }

                match rule.category {
                    Category::Skill => {
                        for skill in self.skill_names(captured) {
                            if !skills.contains(&skill) {
                                skills.push(skill);
                            }
                        }
                    }
                    Category::Location => {
                        if filters.location.is_none() {
                            filters.location = Some(join_text(captured));
                        }
                    }
                    Category::Experience => {
                        if filters.experience.is_none() {
                            filters.experience = number_value(&captured[0], &self.vocabulary)
                                .and_then(|years| u32::try_from(years).ok());
                        }
                    }
                    Category::EducationLevel => {
                        if filters.education_level.is_none() {
                            filters.education_level = Some(self.education_level(captured));
                        }
                    }
                    Category::Institution => {
                        if filters.institution.is_none() {
                            filters.institution = Some(join_text(captured));
                        }
                    }
                    Category::MinSalary => {
                        if filters.min_salary.is_none() {
                            filters.min_salary = number_value(&captured[0], &self.vocabulary);
                        }
                    }
                    Category::Remote => {
                        filters.remote = Some(true);
                    }
                    Category::ImmediateJoining => {
                        filters.immediate_joining = Some(true);
                    }
                }
            }
        }

        if !skills.is_empty() {
            filters.skills = Some(skills);
        }

        filters
    }

    /// A known multi-word term stays whole; any other noun run yields one skill
    /// per word, since record skills are matched one name at a time.
    fn skill_names(&self, captured: &[TaggedToken]) -> Vec<String> {
        let joined = join_lower(captured);
        if captured.len() == 1 || self.vocabulary.is_skill_term(&joined) {
            return vec![joined];
        }
        captured.iter().map(|token| token.lower.clone()).collect()
    }

    fn education_level(&self, captured: &[TaggedToken]) -> String {
        let lower = join_lower(captured);
        let root = captured
            .iter()
            .map(|token| token.root.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        self.vocabulary
            .education_level(&lower)
            .or_else(|| self.vocabulary.education_level(&root))
            .unwrap_or(lower)
    }
}

fn join_lower(tokens: &[TaggedToken]) -> String {
    tokens
        .iter()
        .map(|token| token.lower.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_text(tokens: &[TaggedToken]) -> String {
    tokens
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
