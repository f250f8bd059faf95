use crate::models::{Education, FilterSet, Record, ScoredRecord};
use tracing::{debug, trace};

/// Keeps the candidates that satisfy every active constraint in `filters`,
/// preserving their relative order.
pub fn apply_strict_filters(candidates: Vec<ScoredRecord>, filters: &FilterSet) -> Vec<ScoredRecord> {
    let before = candidates.len();
    let kept: Vec<ScoredRecord> = candidates
        .into_iter()
        .filter(|candidate| match first_failure(&candidate.record, filters) {
            Some(constraint) => {
                trace!(record = %candidate.record.id, constraint, "record rejected");
                false
            }
            None => true,
        })
        .collect();

    debug!(before, after = kept.len(), "strict filter cascade");
    kept
}

pub fn passes(record: &Record, filters: &FilterSet) -> bool {
    first_failure(record, filters).is_none()
}

/// Name of the first constraint `record` fails, in cascade order.
///
/// A constraint whose field is missing on the record fails.
pub fn first_failure(record: &Record, filters: &FilterSet) -> Option<&'static str> {
    if let Some(skills) = filters.skills.as_ref().filter(|skills| !skills.is_empty()) {
        let wanted: Vec<String> = skills.iter().map(|skill| skill.to_lowercase()).collect();
        let matched = record.skills.iter().any(|name| {
            let name = name.to_lowercase();
            wanted.iter().any(|skill| name.contains(skill.as_str()))
        });
        if !matched {
            return Some("skills");
        }
    }

    if let Some(location) = &filters.location {
        let matched = record
            .location
            .as_deref()
            .is_some_and(|place| contains_ignore_case(place, location));
        if !matched {
            return Some("location");
        }
    }

    if let Some(minimum) = filters.experience {
        if !record.experience_years.is_some_and(|years| years >= minimum) {
            return Some("experience");
        }
    }

    if let Some(level) = &filters.education_level {
        if !any_education(&record.education, |entry| entry.level.as_deref(), level) {
            return Some("educationLevel");
        }
    }

    if let Some(institution) = &filters.institution {
        if !any_education(&record.education, |entry| entry.institution.as_deref(), institution) {
            return Some("institution");
        }
    }

    if let Some(minimum) = filters.min_salary {
        if !record.min_salary.is_some_and(|salary| salary >= minimum) {
            return Some("minSalary");
        }
    }

    if let Some(remote) = filters.remote {
        if record.remote != Some(remote) {
            return Some("remote");
        }
    }

    if filters.immediate_joining == Some(true) {
        let immediate = record.immediate_joining == Some(true)
            || record
                .availability
                .as_deref()
                .is_some_and(|availability| availability.trim().eq_ignore_ascii_case("immediate"));
        if !immediate {
            return Some("immediateJoining");
        }
    }

    None
}

fn any_education<'a>(
    entries: &'a [Education],
    field: impl Fn(&'a Education) -> Option<&'a str>,
    wanted: &str,
) -> bool {
    entries
        .iter()
        .filter_map(field)
        .any(|value| contains_ignore_case(value, wanted))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
