//! Pattern templates over part-of-speech tagged query tokens.
//!
//! A [`Template`] is a sequence of [`Slot`]s. Matching is anchored per start
//! position, backtracks over repeated tag slots, and reports non-overlapping
//! matches from left to right. The extractor's rule table ([`rules_for`]) is
//! built from a [`Vocabulary`], so every rule can be exercised with
//! hand-built tokens and no tagger at all.

use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pos {
    Noun,
    Place,
    Number,
    Unit,
    Preposition,
    Adjective,
    Verb,
    Function,
}

impl Pos {
    /// Places are nouns too, so a noun slot accepts them.
    pub fn satisfies(self, wanted: Pos) -> bool {
        self == wanted || (wanted == Pos::Noun && self == Pos::Place)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedToken {
    pub text: String,
    pub lower: String,
    pub root: String,
    pub pos: Pos,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: Pos) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        let root = singular_root(&lower);
        Self {
            text,
            lower,
            root,
            pos,
        }
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.lower == word || self.root == word
    }
}

/// Cheap plural folding so `developers` matches `developer` and `yrs` matches `yr`.
pub fn singular_root(lower: &str) -> String {
    let chars = lower.chars().count();
    if chars > 4 && lower.ends_with("ies") {
        format!("{}y", &lower[..lower.len() - 3])
    } else if chars > 2 && lower.ends_with('s') && !lower.ends_with("ss") {
        lower[..lower.len() - 1].to_string()
    } else {
        lower.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Any one of these phrases; each phrase is a list of lowercase words.
    Words(Vec<Vec<String>>),
    /// One token with this tag, or a run of them when `repeat` is set.
    Tagged { pos: Pos, repeat: bool },
}

impl Slot {
    pub fn words<S: AsRef<str>>(phrases: &[S]) -> Self {
        let mut split: Vec<Vec<String>> = phrases
            .iter()
            .map(|phrase| {
                phrase
                    .as_ref()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
            })
            .filter(|words| !words.is_empty())
            .collect();
        // Longest alternative first so "more than" beats "more".
        split.sort_by(|left, right| right.len().cmp(&left.len()));
        Slot::Words(split)
    }

    pub fn tag(pos: Pos) -> Self {
        Slot::Tagged { pos, repeat: false }
    }

    pub fn tags(pos: Pos) -> Self {
        Slot::Tagged { pos, repeat: true }
    }

    /// End positions this slot can reach from `start`, most greedy first.
    fn ends(&self, tokens: &[TaggedToken], start: usize) -> Vec<usize> {
        match self {
            Slot::Words(phrases) => {
                let mut ends = Vec::new();
                for phrase in phrases {
                    let end = start + phrase.len();
                    if end > tokens.len() {
                        continue;
                    }
                    let matched = tokens[start..end]
                        .iter()
                        .zip(phrase)
                        .all(|(token, word)| token.is_word(word));
                    if matched && !ends.contains(&end) {
                        ends.push(end);
                    }
                }
                ends
            }
            Slot::Tagged { pos, repeat } => {
                let run = tokens[start.min(tokens.len())..]
                    .iter()
                    .take_while(|token| token.pos.satisfies(*pos))
                    .count();
                if run == 0 {
                    Vec::new()
                } else if *repeat {
                    (1..=run).rev().map(|length| start + length).collect()
                } else {
                    vec![start + 1]
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub slots: Vec<Slot>,
    /// Index of the slot whose tokens carry the extracted value.
    pub capture: usize,
}

impl Template {
    pub fn new(slots: Vec<Slot>, capture: usize) -> Self {
        Self { slots, capture }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    pub span: Range<usize>,
    pub slots: Vec<Range<usize>>,
}

impl TemplateMatch {
    pub fn slot_tokens<'a>(&self, tokens: &'a [TaggedToken], slot: usize) -> &'a [TaggedToken] {
        self.slots
            .get(slot)
            .map(|range| &tokens[range.clone()])
            .unwrap_or(&[])
    }
}

/// All non-overlapping matches of `template` in `tokens`, leftmost first.
pub fn match_template(tokens: &[TaggedToken], template: &Template) -> Vec<TemplateMatch> {
    let mut matches = Vec::new();
    if template.slots.is_empty() {
        return matches;
    }

    let mut start = 0;
    while start < tokens.len() {
        let mut ranges = Vec::with_capacity(template.slots.len());
        if match_from(tokens, &template.slots, start, &mut ranges) {
            let end = ranges.last().map(|range| range.end).unwrap_or(start + 1);
            matches.push(TemplateMatch {
                span: start..end,
                slots: ranges,
            });
            start = end.max(start + 1);
        } else {
            start += 1;
        }
    }

    matches
}

fn match_from(
    tokens: &[TaggedToken],
    slots: &[Slot],
    position: usize,
    ranges: &mut Vec<Range<usize>>,
) -> bool {
    let Some((slot, rest)) = slots.split_first() else {
        return true;
    };
    if position >= tokens.len() {
        return false;
    }

    for end in slot.ends(tokens, position) {
        ranges.push(position..end);
        if match_from(tokens, rest, end, ranges) {
            return true;
        }
        ranges.pop();
    }

    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Skill,
    Location,
    Experience,
    EducationLevel,
    Institution,
    MinSalary,
    Remote,
    ImmediateJoining,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub category: Category,
    pub template: Template,
}

impl Rule {
    pub fn new(category: Category, slots: Vec<Slot>, capture: usize) -> Self {
        Self {
            category,
            template: Template::new(slots, capture),
        }
    }
}

/// The extraction grammar, in evaluation order.
pub fn rules_for(vocabulary: &Vocabulary) -> Vec<Rule> {
    let education_terms: Vec<&str> = vocabulary
        .education_terms
        .iter()
        .map(|entry| entry.term.as_str())
        .collect();

    vec![
        Rule::new(
            Category::Skill,
            vec![Slot::tags(Pos::Noun), Slot::words(&vocabulary.role_suffixes)],
            0,
        ),
        Rule::new(Category::Skill, vec![Slot::words(&vocabulary.domain_phrases)], 0),
        Rule::new(Category::Skill, vec![Slot::words(&vocabulary.technology_terms)], 0),
        Rule::new(
            Category::Location,
            vec![
                Slot::words(&vocabulary.location_prepositions),
                Slot::tags(Pos::Place),
            ],
            1,
        ),
        Rule::new(
            Category::Experience,
            vec![Slot::tag(Pos::Number), Slot::words(&vocabulary.experience_units)],
            0,
        ),
        Rule::new(Category::EducationLevel, vec![Slot::words(&education_terms)], 0),
        Rule::new(Category::Institution, vec![Slot::words(&vocabulary.institutions)], 0),
        Rule::new(
            Category::MinSalary,
            vec![
                Slot::words(&vocabulary.salary_lead_words),
                Slot::tag(Pos::Number),
                Slot::words(&vocabulary.salary_units),
            ],
            1,
        ),
        Rule::new(Category::Remote, vec![Slot::words(&vocabulary.remote_phrases)], 0),
        Rule::new(
            Category::ImmediateJoining,
            vec![Slot::words(&vocabulary.immediate_phrases)],
            0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(spec: &[(&str, Pos)]) -> Vec<TaggedToken> {
        spec.iter()
            .map(|(text, pos)| TaggedToken::new(*text, *pos))
            .collect()
    }

    #[test]
    fn plural_roots_fold_to_singular() {
        assert_eq!(singular_root("developers"), "developer");
        assert_eq!(singular_root("universities"), "university");
        assert_eq!(singular_root("yrs"), "yr");
        assert_eq!(singular_root("express"), "express");
    }

    #[test]
    fn noun_run_backtracks_to_leave_room_for_suffix() {
        let query = tokens(&[
            ("machine", Pos::Noun),
            ("learning", Pos::Noun),
            ("engineers", Pos::Noun),
        ]);
        let template = Template::new(
            vec![Slot::tags(Pos::Noun), Slot::words(&["engineer", "developer"])],
            0,
        );

        let matches = match_template(&query, &template);

        assert_eq!(matches.len(), 1);
        let skill: Vec<_> = matches[0]
            .slot_tokens(&query, 0)
            .iter()
            .map(|token| token.lower.as_str())
            .collect();
        assert_eq!(skill, vec!["machine", "learning"]);
    }

    #[test]
    fn multi_word_alternatives_prefer_the_longest() {
        let query = tokens(&[
            ("paying", Pos::Verb),
            ("more", Pos::Function),
            ("than", Pos::Preposition),
            ("20", Pos::Number),
            ("lpa", Pos::Unit),
        ]);
        let template = Template::new(
            vec![
                Slot::words(&["more", "more than"]),
                Slot::tag(Pos::Number),
                Slot::words(&["lpa"]),
            ],
            1,
        );

        let matches = match_template(&query, &template);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span, 1..5);
        assert_eq!(matches[0].slot_tokens(&query, 1)[0].text, "20");
    }

    #[test]
    fn matches_do_not_overlap() {
        let query = tokens(&[
            ("python", Pos::Noun),
            ("developers", Pos::Noun),
            ("and", Pos::Function),
            ("java", Pos::Noun),
            ("developers", Pos::Noun),
        ]);
        let template = Template::new(vec![Slot::tags(Pos::Noun), Slot::words(&["developer"])], 0);

        let matches = match_template(&query, &template);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].span, 0..2);
        assert_eq!(matches[1].span, 3..5);
    }

    #[test]
    fn place_tokens_satisfy_noun_slots() {
        assert!(Pos::Place.satisfies(Pos::Noun));
        assert!(!Pos::Noun.satisfies(Pos::Place));
    }

    #[test]
    fn default_rules_cover_every_category_in_order() {
        let rules = rules_for(&Vocabulary::default());
        let categories: Vec<_> = rules.iter().map(|rule| rule.category).collect();
        assert_eq!(categories.first(), Some(&Category::Skill));
        assert_eq!(categories.last(), Some(&Category::ImmediateJoining));
        assert_eq!(categories.iter().filter(|c| **c == Category::Skill).count(), 3);
    }
}
