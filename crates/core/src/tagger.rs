use crate::grammar::{Pos, TaggedToken};
use crate::traits::Tagger;
use crate::vocabulary::Vocabulary;
use regex::Regex;
use std::sync::{Arc, OnceLock};

const WORD_PATTERN: &str = r"[\p{L}\p{N}][\p{L}\p{N}_.+#]*";
const NUMBER_PATTERN: &str = r"^\d+(?:\.\d+)?\+?$";

// Literal patterns, compiled in `fixed_patterns_compile`.
fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(WORD_PATTERN).expect("word pattern is a valid regex"))
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NUMBER_PATTERN).expect("number pattern is a valid regex"))
}

/// Splits raw query text into words, keeping `.`, `+` and `#` inside terms
/// such as `node.js`, `c++` or `b.tech`.
pub fn split_words(text: &str) -> Vec<&str> {
    word_pattern()
        .find_iter(text)
        .map(|found| found.as_str().trim_end_matches('.'))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Parses the leading integer of a number token (`"3"`, `"5+"`) or a number word.
pub fn number_value(token: &TaggedToken, vocabulary: &Vocabulary) -> Option<u64> {
    if let Some(value) = vocabulary.number_words.get(&token.lower) {
        return Some(u64::from(*value));
    }

    let digits: String = token.lower.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Dictionary-driven part-of-speech tagger.
///
/// Known places are tagged first (multi-word ones included), then closed word
/// classes from the vocabulary. Only `known_places` entries become places, so
/// a capitalized company or product name stays a noun.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    vocabulary: Arc<Vocabulary>,
    places: Vec<Vec<String>>,
}

impl LexiconTagger {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        let mut places: Vec<Vec<String>> = vocabulary
            .known_places
            .iter()
            .map(|place| place.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|words| !words.is_empty())
            .collect();
        places.sort_by(|left, right| right.len().cmp(&left.len()));

        Self { vocabulary, places }
    }

    fn known_place_at(&self, tokens: &[TaggedToken], start: usize) -> usize {
        self.places
            .iter()
            .find(|place| {
                start + place.len() <= tokens.len()
                    && tokens[start..start + place.len()]
                        .iter()
                        .zip(place.iter())
                        .all(|(token, word)| token.lower == *word)
            })
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn word_class(&self, token: &TaggedToken) -> Pos {
        let vocabulary = &*self.vocabulary;
        let in_table = |table: &[String]| {
            table
                .iter()
                .any(|entry| *entry == token.lower || *entry == token.root)
        };

        if number_pattern().is_match(&token.lower)
            || vocabulary.number_words.contains_key(&token.lower)
        {
            Pos::Number
        } else if in_table(&vocabulary.prepositions) {
            Pos::Preposition
        } else if in_table(&vocabulary.function_words) || in_table(&vocabulary.filler_words) {
            Pos::Function
        } else if in_table(&vocabulary.experience_units) || in_table(&vocabulary.salary_units) {
            Pos::Unit
        } else if in_table(&vocabulary.adjectives) {
            Pos::Adjective
        } else if in_table(&vocabulary.verbs) {
            Pos::Verb
        } else {
            Pos::Noun
        }
    }
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens: Vec<TaggedToken> = split_words(text)
            .into_iter()
            .map(|word| TaggedToken::new(word, Pos::Noun))
            .collect();

        let mut index = 0;
        while index < tokens.len() {
            let place_len = self.known_place_at(&tokens, index);
            if place_len > 0 {
                for token in &mut tokens[index..index + place_len] {
                    token.pos = Pos::Place;
                }
                index += place_len;
                continue;
            }

            tokens[index].pos = self.word_class(&tokens[index]);
            index += 1;
        }

        tokens
    }
}
