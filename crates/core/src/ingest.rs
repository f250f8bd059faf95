use crate::error::{MatchError, Result};
use crate::models::{Record, RecordKind};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

pub fn discover_record_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_json = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

pub struct LoadReport {
    pub records: RecordCollection,
    pub skipped_files: Vec<SkippedFile>,
}

/// Records loaded from disk, in file order then document order.
#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops closed job postings; candidates are always kept.
    pub fn active_only(self) -> Self {
        Self {
            records: self
                .records
                .into_iter()
                .filter(|record| record.kind != RecordKind::Job || record.active)
                .collect(),
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Parses one collection document: an array of records, or an object with
/// `jobs` and/or `candidates` arrays, or a single record object.
pub fn parse_collection(raw: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(raw)?;

    match value {
        Value::Array(items) => documents_to_records(&items, RecordKind::Unknown),
        Value::Object(ref fields) if fields.contains_key("jobs") || fields.contains_key("candidates") => {
            let mut records = Vec::new();
            for (key, kind) in [("jobs", RecordKind::Job), ("candidates", RecordKind::Candidate)] {
                match fields.get(key) {
                    Some(Value::Array(items)) => records.extend(documents_to_records(items, kind)?),
                    Some(other) if !other.is_null() => {
                        return Err(MatchError::InvalidRecord(format!("`{key}` must be an array")));
                    }
                    _ => {}
                }
            }
            Ok(records)
        }
        Value::Object(_) => Ok(vec![Record::from_document(&value)?]),
        _ => Err(MatchError::InvalidRecord(
            "collection must be an array or an object".to_string(),
        )),
    }
}

fn documents_to_records(items: &[Value], kind: RecordKind) -> Result<Vec<Record>> {
    items
        .iter()
        .map(|item| Record::from_document_with_kind(item, kind))
        .collect()
}

pub fn load_record_file(path: &Path) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path)?;
    parse_collection(&raw)
}

/// Loads a single JSON file, or every JSON file below a directory, skipping
/// files that cannot be read or parsed.
pub fn load_records(path: &Path) -> Result<LoadReport> {
    if path.is_file() {
        let records = load_record_file(path)?;
        return Ok(LoadReport {
            records: RecordCollection::new(records),
            skipped_files: Vec::new(),
        });
    }

    if !path.is_dir() {
        return Err(MatchError::InvalidArgument(format!(
            "record path does not exist: {}",
            path.display()
        )));
    }

    let files = discover_record_files(path);
    if files.is_empty() {
        return Err(MatchError::InvalidArgument(format!(
            "no json files found in {}",
            path.display()
        )));
    }

    let mut records = Vec::new();
    let mut skipped_files = Vec::new();

    for file in files {
        match load_record_file(&file) {
            Ok(loaded) => records.extend(loaded),
            Err(error) => {
                warn!(path = %file.display(), %error, "skipping record file");
                skipped_files.push(SkippedFile {
                    path: file,
                    reason: error.to_string(),
                });
            }
        }
    }

    Ok(LoadReport {
        records: RecordCollection::new(records),
        skipped_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn discover_record_files_is_recursive() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let base = dir.path();
        let nested = base.join("nested");
        fs::create_dir(&nested)?;

        File::create(base.join("jobs.json")).and_then(|mut file| file.write_all(b"[]"))?;
        File::create(nested.join("people.JSON")).and_then(|mut file| file.write_all(b"[]"))?;
        File::create(base.join("notes.txt")).and_then(|mut file| file.write_all(b"ignore"))?;

        let files = discover_record_files(base);
        assert_eq!(files.len(), 2);
        Ok(())
    }

    #[test]
    fn grouped_collections_assign_kinds() -> Result<(), Box<dyn std::error::Error>> {
        let records = parse_collection(
            r#"{
                "jobs": [{"description": "Build APIs", "location": "Pune"}],
                "candidates": [{"text": "Rust hobbyist"}]
            }"#,
        )?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, RecordKind::Job);
        assert_eq!(records[1].kind, RecordKind::Candidate);
        Ok(())
    }

    #[test]
    fn scalar_collections_are_rejected() {
        assert!(parse_collection("42").is_err());
        assert!(parse_collection(r#"{"jobs": "nope"}"#).is_err());
    }

    #[test]
    fn loading_fails_without_json_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        assert!(load_records(dir.path()).is_err());
        assert!(load_records(&dir.path().join("missing.json")).is_err());
        Ok(())
    }

    #[test]
    fn best_effort_skips_unreadable_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.json"), r#"[{"title": "SRE", "company": "Acme"}]"#)?;
        fs::write(dir.path().join("broken.json"), b"{not json")?;

        let report = load_records(dir.path())?;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped_files.len(), 1);
        assert_eq!(
            report.skipped_files[0]
                .path
                .file_name()
                .and_then(|name| name.to_str()),
            Some("broken.json")
        );
        Ok(())
    }

    #[test]
    fn demo_dataset_loads() -> Result<(), Box<dyn std::error::Error>> {
        let records = parse_collection(include_str!("../../../data/demo-records.json"))?;
        let jobs = records.iter().filter(|record| record.kind == RecordKind::Job).count();

        assert_eq!(records.len(), 8);
        assert_eq!(jobs, 4);
        assert_eq!(RecordCollection::new(records).active_only().len(), 7);
        Ok(())
    }

    #[test]
    fn active_only_drops_closed_jobs() -> Result<(), Box<dyn std::error::Error>> {
        let records = parse_collection(
            r#"[
                {"title": "Open", "company": "Acme"},
                {"title": "Closed", "company": "Acme", "active": false},
                {"name": "Kiran", "email": "kiran@example.com", "active": false}
            ]"#,
        )?;

        let active = RecordCollection::new(records).active_only();
        let titles: Vec<_> = active
            .records()
            .iter()
            .filter_map(|record| record.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["Open", "Kiran"]);
        Ok(())
    }
}
