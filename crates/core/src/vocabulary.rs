//! Keyword tables that drive tagging and filter extraction.
//!
//! The tables are plain data. [`Vocabulary::default`] carries the built-in set;
//! a JSON file with any subset of the keys can replace individual tables via
//! [`Vocabulary::from_path`]. Multi-word entries are written space separated
//! (`"work from home"`) and are matched as consecutive query tokens.

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EducationTerm {
    pub term: String,
    /// Level stored in the filter when the term matches; the term itself when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Vocabulary {
    pub role_suffixes: Vec<String>,
    pub technology_terms: Vec<String>,
    pub domain_phrases: Vec<String>,
    pub location_prepositions: Vec<String>,
    pub known_places: Vec<String>,
    pub experience_units: Vec<String>,
    pub education_terms: Vec<EducationTerm>,
    pub institutions: Vec<String>,
    pub salary_lead_words: Vec<String>,
    pub salary_units: Vec<String>,
    pub remote_phrases: Vec<String>,
    pub immediate_phrases: Vec<String>,
    pub number_words: BTreeMap<String, u32>,
    pub prepositions: Vec<String>,
    pub function_words: Vec<String>,
    /// Generic nouns ("experience", "roles") that never name a skill.
    pub filler_words: Vec<String>,
    pub adjectives: Vec<String>,
    pub verbs: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        const BACHELORS: &str = "Bachelors";
        const MASTERS: &str = "Masters";
        const PHD: &str = "PhD";

        let education_terms = [
            ("undergraduate", None),
            ("graduate", None),
            ("phd", Some(PHD)),
            ("ph.d", Some(PHD)),
            ("doctorate", Some(PHD)),
            ("bachelor", Some(BACHELORS)),
            ("btech", Some(BACHELORS)),
            ("b.tech", Some(BACHELORS)),
            ("b.e", Some(BACHELORS)),
            ("master", Some(MASTERS)),
            ("mtech", Some(MASTERS)),
            ("m.tech", Some(MASTERS)),
            ("m.e", Some(MASTERS)),
        ]
        .into_iter()
        .map(|(term, canonical)| EducationTerm {
            term: term.to_string(),
            canonical: canonical.map(str::to_string),
        })
        .collect();

        let number_words = [
            ("one", 1),
            ("two", 2),
            ("three", 3),
            ("four", 4),
            ("five", 5),
            ("six", 6),
            ("seven", 7),
            ("eight", 8),
            ("nine", 9),
            ("ten", 10),
            ("twelve", 12),
            ("fifteen", 15),
            ("twenty", 20),
        ]
        .into_iter()
        .map(|(word, value)| (word.to_string(), value))
        .collect();

        Self {
            role_suffixes: owned(&[
                "developer",
                "engineer",
                "programmer",
                "analyst",
                "manager",
                "specialist",
            ]),
            technology_terms: owned(&[
                "python", "java", "javascript", "typescript", "react", "node.js", "nodejs",
                "angular", "vue", "html", "css", "sql", "mysql", "postgresql", "mongodb",
                "redis", "graphql", "aws", "azure", "gcp", "docker", "kubernetes", "terraform",
                "ansible", "jenkins", "linux", "git", "django", "flask", "spring", "hibernate",
                "express", "golang", "rust", "c++", "c#", "kotlin", "swift", "flutter", "android",
                "ios", "php", "ruby", "scala", "tensorflow", "pytorch", "pandas", "spark",
                "hadoop", "selenium", "cypress", "jest", "figma", "microservices",
            ]),
            domain_phrases: owned(&[
                "machine learning",
                "deep learning",
                "software engineering",
                "data science",
                "data engineering",
                "artificial intelligence",
                "computer vision",
                "natural language processing",
                "cloud computing",
                "web development",
                "mobile development",
                "full stack",
                "spring boot",
            ]),
            location_prepositions: owned(&["in", "from", "at", "for"]),
            known_places: owned(&[
                "bangalore", "bengaluru", "mumbai", "delhi", "new delhi", "pune", "hyderabad",
                "chennai", "kolkata", "gurgaon", "gurugram", "noida", "ahmedabad", "jaipur",
                "kochi", "chandigarh", "indore", "coimbatore", "karnataka", "maharashtra",
                "telangana", "tamil nadu", "haryana", "ncr", "india", "london", "berlin",
                "singapore", "new york", "san francisco", "toronto",
            ]),
            experience_units: owned(&["year", "years", "yr", "yrs"]),
            education_terms,
            institutions: owned(&[
                "iit",
                "iim",
                "nit",
                "university",
                "college",
                "institute",
                "bits",
                "srm",
                "vit",
                "jiit",
            ]),
            salary_lead_words: owned(&["above", "more than", "over", "paying"]),
            salary_units: owned(&["lpa", "lakh", "salary"]),
            remote_phrases: owned(&["remote", "work from home", "wfh"]),
            immediate_phrases: owned(&["immediately", "immediate", "join now", "urgent", "asap"]),
            number_words,
            prepositions: owned(&[
                "in", "from", "at", "for", "with", "of", "to", "on", "by", "than", "over",
                "above", "under", "near", "within", "into", "as",
            ]),
            function_words: owned(&[
                "a", "an", "the", "and", "or", "who", "that", "which", "is", "are", "be", "has",
                "have", "having", "any", "some", "our", "my", "me", "we", "us", "more", "less",
                "least", "plus", "minimum", "min", "atleast", "all", "can", "should", "must",
            ]),
            filler_words: owned(&[
                "experience", "exp", "candidate", "job", "role", "opening", "position",
                "people", "profile", "talent", "vacancy", "fresher",
            ]),
            adjectives: owned(&[
                "senior", "junior", "experienced", "skilled", "good", "strong", "top", "best",
                "fresh", "lead", "principal", "mid", "entry", "expert", "talented", "remote",
            ]),
            verbs: owned(&[
                "looking", "hiring", "hire", "need", "needs", "needed", "want", "wanted",
                "seeking", "find", "show", "join", "work", "working", "paying", "required",
                "require", "get", "search",
            ]),
        }
    }
}

impl Vocabulary {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let vocabulary: Vocabulary = serde_json::from_str(raw)?;
        vocabulary.validate()?;
        Ok(vocabulary.lowercased())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("roleSuffixes", &self.role_suffixes),
            ("experienceUnits", &self.experience_units),
            ("salaryUnits", &self.salary_units),
            ("locationPrepositions", &self.location_prepositions),
        ];
        for (name, table) in required {
            if table.is_empty() {
                return Err(MatchError::InvalidVocabulary(format!("{name} must not be empty")));
            }
        }

        let all_terms = self
            .phrase_tables()
            .into_iter()
            .flatten()
            .chain(self.education_terms.iter().map(|entry| &entry.term));
        if let Some(blank) = all_terms.into_iter().find(|term| term.trim().is_empty()) {
            return Err(MatchError::InvalidVocabulary(format!(
                "blank vocabulary entry {blank:?}"
            )));
        }

        Ok(())
    }

    /// Level to store for an education term, or `None` when the term is not in the table.
    pub fn education_level(&self, term: &str) -> Option<String> {
        self.education_terms
            .iter()
            .find(|entry| entry.term == term)
            .map(|entry| entry.canonical.clone().unwrap_or_else(|| entry.term.clone()))
    }

    /// True when `phrase` is a whole technology term or domain phrase.
    pub fn is_skill_term(&self, phrase: &str) -> bool {
        self.technology_terms
            .iter()
            .chain(&self.domain_phrases)
            .any(|entry| entry == phrase)
    }

    fn phrase_tables(&self) -> [&Vec<String>; 15] {
        [
            &self.role_suffixes,
            &self.technology_terms,
            &self.domain_phrases,
            &self.location_prepositions,
            &self.experience_units,
            &self.institutions,
            &self.salary_lead_words,
            &self.salary_units,
            &self.remote_phrases,
            &self.immediate_phrases,
            &self.prepositions,
            &self.function_words,
            &self.filler_words,
            &self.adjectives,
            &self.verbs,
        ]
    }

    fn lowercased(mut self) -> Self {
        let lower_all = |table: &mut Vec<String>| {
            for entry in table.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
        };

        lower_all(&mut self.role_suffixes);
        lower_all(&mut self.technology_terms);
        lower_all(&mut self.domain_phrases);
        lower_all(&mut self.location_prepositions);
        lower_all(&mut self.known_places);
        lower_all(&mut self.experience_units);
        lower_all(&mut self.institutions);
        lower_all(&mut self.salary_lead_words);
        lower_all(&mut self.salary_units);
        lower_all(&mut self.remote_phrases);
        lower_all(&mut self.immediate_phrases);
        lower_all(&mut self.prepositions);
        lower_all(&mut self.function_words);
        lower_all(&mut self.filler_words);
        lower_all(&mut self.adjectives);
        lower_all(&mut self.verbs);
        for entry in &mut self.education_terms {
            entry.term = entry.term.trim().to_lowercase();
        }
        self.number_words = self
            .number_words
            .into_iter()
            .map(|(word, value)| (word.trim().to_lowercase(), value))
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn default_vocabulary_is_valid() {
        assert!(Vocabulary::default().validate().is_ok());
    }

    #[test]
    fn education_terms_normalize_abbreviations() {
        let vocabulary = Vocabulary::default();
        assert_eq!(vocabulary.education_level("b.tech").as_deref(), Some("Bachelors"));
        assert_eq!(vocabulary.education_level("m.e").as_deref(), Some("Masters"));
        assert_eq!(vocabulary.education_level("phd").as_deref(), Some("PhD"));
        assert_eq!(
            vocabulary.education_level("undergraduate").as_deref(),
            Some("undergraduate")
        );
        assert_eq!(vocabulary.education_level("diploma"), None);
    }

    #[test]
    fn partial_override_keeps_default_tables() -> Result<(), Box<dyn std::error::Error>> {
        let vocabulary = Vocabulary::from_json_str(r#"{"institutions": ["IISc", "Anna University"]}"#)?;

        assert_eq!(vocabulary.institutions, vec!["iisc", "anna university"]);
        assert_eq!(vocabulary.role_suffixes, Vocabulary::default().role_suffixes);
        Ok(())
    }

    #[test]
    fn empty_required_table_is_rejected() {
        let result = Vocabulary::from_json_str(r#"{"roleSuffixes": []}"#);
        assert!(matches!(result, Err(MatchError::InvalidVocabulary(_))));
    }

    #[test]
    fn vocabulary_loads_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("vocabulary.json");
        fs::write(&path, r#"{"remotePhrases": ["remote", "anywhere"]}"#)?;

        let vocabulary = Vocabulary::from_path(&path)?;
        assert_eq!(vocabulary.remote_phrases, vec!["remote", "anywhere"]);
        Ok(())
    }

    #[test]
    fn skill_terms_match_whole_entries() {
        let vocabulary = Vocabulary::default();
        assert!(vocabulary.is_skill_term("python"));
        assert!(vocabulary.is_skill_term("machine learning"));
        assert!(!vocabulary.is_skill_term("machine"));
        assert!(!vocabulary.is_skill_term("bangalore"));
    }
}
