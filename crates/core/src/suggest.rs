use crate::error::Result;
use crate::models::{Record, RecordKind, Suggestion};
use regex::RegexBuilder;

/// Prefixes shorter than this produce no suggestions.
pub const MIN_PREFIX_CHARS: usize = 2;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Typeahead suggestions: jobs matched on title, company or location, then
/// candidates matched on name, skill or location, at most `limit_per_kind` each.
///
/// The prefix is matched literally and case-insensitively anywhere in the field.
/// Inactive jobs are never suggested.
pub fn suggestions(prefix: &str, records: &[Record], limit_per_kind: usize) -> Result<Vec<Suggestion>> {
    let prefix = prefix.trim();
    if prefix.chars().count() < MIN_PREFIX_CHARS {
        return Ok(Vec::new());
    }

    let pattern = RegexBuilder::new(&regex::escape(prefix))
        .case_insensitive(true)
        .build()?;
    let hit = |value: Option<&str>| value.is_some_and(|value| pattern.is_match(value));

    let jobs = records
        .iter()
        .filter(|record| record.kind == RecordKind::Job && record.active)
        .filter(|record| {
            hit(record.title.as_deref()) || hit(record.company.as_deref()) || hit(record.location.as_deref())
        })
        .take(limit_per_kind)
        .map(|record| Suggestion {
            kind: RecordKind::Job,
            text: match (&record.title, &record.company) {
                (Some(title), Some(company)) => format!("{title} at {company}"),
                (Some(title), None) => title.clone(),
                (None, company) => company.clone().unwrap_or_default(),
            },
            id: record.id.clone(),
        });

    let candidates = records
        .iter()
        .filter(|record| record.kind == RecordKind::Candidate)
        .filter(|record| {
            hit(record.title.as_deref())
                || record.skills.iter().any(|skill| hit(Some(skill.as_str())))
                || hit(record.location.as_deref())
        })
        .take(limit_per_kind)
        .map(|record| Suggestion {
            kind: RecordKind::Candidate,
            text: format!(
                "{} - {}",
                record.title.as_deref().unwrap_or_default(),
                record.skills.join(", ")
            ),
            id: record.id.clone(),
        });

    Ok(jobs.chain(candidates).collect())
}
