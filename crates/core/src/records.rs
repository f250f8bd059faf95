//! Normalization of loosely-shaped job and candidate documents.
//!
//! Jobs nest their constraints under `requirements` while candidates keep them
//! at the top level; skills are either plain strings or `{name, level}` objects;
//! education is a single object or a list. Everything is folded into one
//! [`Record`] here so the scorer and the cascade never probe raw documents.

use crate::error::{MatchError, Result};
use crate::models::{Education, Record, RecordKind};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

const JOB_FIELDS: [&str; 5] = ["title", "company", "requirements", "salary", "jobType"];
const CANDIDATE_FIELDS: [&str; 4] = ["name", "email", "expectedSalary", "availability"];

impl Record {
    pub fn from_document(document: &Value) -> Result<Record> {
        Self::from_document_with_kind(document, RecordKind::Unknown)
    }

    /// Like [`Record::from_document`], using `fallback` when the kind cannot be inferred.
    pub fn from_document_with_kind(document: &Value, fallback: RecordKind) -> Result<Record> {
        let fields = document.as_object().ok_or_else(|| {
            MatchError::InvalidRecord(format!("expected a JSON object, found {}", type_name(document)))
        })?;
        let requirements = fields.get("requirements").and_then(Value::as_object);

        let kind = match infer_kind(fields) {
            RecordKind::Unknown => fallback,
            kind => kind,
        };

        let skills = match fields.get("skills") {
            Some(Value::Array(items)) => skill_names(items),
            _ => requirements
                .and_then(|requirements| requirements.get("skills"))
                .and_then(Value::as_array)
                .map(|items| skill_names(items))
                .unwrap_or_default(),
        };

        let experience_years = fields
            .get("experience")
            .and_then(|experience| match experience {
                Value::Object(experience) => experience.get("total").and_then(loose_u64),
                other => loose_u64(other),
            })
            .or_else(|| {
                requirements
                    .and_then(|requirements| requirements.get("experience"))
                    .and_then(|experience| experience.get("min"))
                    .and_then(loose_u64)
            })
            .and_then(|years| u32::try_from(years).ok());

        let education = fields
            .get("education")
            .filter(|value| !value.is_null())
            .or_else(|| requirements.and_then(|requirements| requirements.get("education")))
            .map(education_entries)
            .unwrap_or_default();

        let min_salary = ["salary", "expectedSalary"].iter().find_map(|key| {
            fields
                .get(*key)
                .and_then(|salary| salary.get("min"))
                .and_then(loose_u64)
        });

        let remote = fields.get("remote").and_then(loose_bool).or_else(|| {
            string_field(fields, "jobType")
                .filter(|job_type| job_type.eq_ignore_ascii_case("remote"))
                .map(|_| true)
        });

        Ok(Record {
            id: record_id(fields, document),
            kind,
            text: first_string(fields, &["text", "description"]),
            title: first_string(fields, &["title", "name"]),
            company: first_string(fields, &["company", "employer"]),
            skills,
            location: string_field(fields, "location"),
            experience_years,
            education,
            min_salary,
            remote,
            immediate_joining: fields.get("immediateJoining").and_then(loose_bool),
            availability: string_field(fields, "availability"),
            active: fields.get("active").and_then(loose_bool).unwrap_or(true),
        })
    }
}

fn infer_kind(fields: &Map<String, Value>) -> RecordKind {
    if let Some(explicit) = first_string(fields, &["kind", "type"]) {
        match explicit.to_lowercase().as_str() {
            "job" | "jobs" => return RecordKind::Job,
            "candidate" | "candidates" => return RecordKind::Candidate,
            _ => {}
        }
    }

    if JOB_FIELDS.iter().any(|key| fields.contains_key(*key)) {
        RecordKind::Job
    } else if CANDIDATE_FIELDS.iter().any(|key| fields.contains_key(*key)) {
        RecordKind::Candidate
    } else {
        RecordKind::Unknown
    }
}

fn record_id(fields: &Map<String, Value>, document: &Value) -> String {
    for key in ["_id", "id"] {
        match fields.get(key) {
            Some(Value::String(id)) if !id.trim().is_empty() => return id.trim().to_string(),
            Some(Value::Number(id)) => return id.to_string(),
            Some(Value::Object(wrapped)) => {
                if let Some(Value::String(id)) = wrapped.get("$oid") {
                    return id.clone();
                }
            }
            _ => {}
        }
    }

    let mut hasher = Sha256::new();
    hasher.update(document.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

fn skill_names(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(name.trim().to_string()),
            Value::Object(skill) => skill
                .get("name")
                .and_then(Value::as_str)
                .map(|name| name.trim().to_string()),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn education_entries(value: &Value) -> Vec<Education> {
    let entry = |item: &Value| {
        item.as_object().map(|fields| Education {
            level: string_field(fields, "level"),
            field: string_field(fields, "field"),
            institution: string_field(fields, "institution"),
        })
    };

    match value {
        Value::Array(items) => items.iter().filter_map(entry).collect(),
        other => entry(other).into_iter().collect(),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_string(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| string_field(fields, key))
}

/// Non-negative integer from a JSON number or numeric string; fractions truncate.
fn loose_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite() && *float >= 0.0)
                .map(|float| float as u64)
        }),
        Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<u64>().ok().or_else(|| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|float| float.is_finite() && *float >= 0.0)
                    .map(|float| float as u64)
            })
        }
        _ => None,
    }
}

fn loose_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
