use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Job,
    Candidate,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Education {
    pub level: Option<String>,
    pub field: Option<String>,
    pub institution: Option<String>,
}

/// Canonical shape of a job posting or candidate profile.
///
/// Every field is optional in spirit: an empty list or `None` means the source
/// document did not carry it. Build these with [`Record::from_document`](crate::records)
/// rather than by hand when the input is loose JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    pub text: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub experience_years: Option<u32>,
    pub education: Vec<Education>,
    pub min_salary: Option<u64>,
    pub remote: Option<bool>,
    pub immediate_joining: Option<bool>,
    pub availability: Option<String>,
    pub active: bool,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: RecordKind::Unknown,
            text: None,
            title: None,
            company: None,
            skills: Vec::new(),
            location: None,
            experience_years: None,
            education: Vec::new(),
            min_salary: None,
            remote: None,
            immediate_joining: None,
            availability: None,
            active: true,
        }
    }
}

/// Structured constraints, either extracted from a query or supplied by the caller.
///
/// A `None` key is unconstrained. Serializes with the camelCase names callers
/// already use (`educationLevel`, `minSalary`, `immediateJoining`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immediate_joining: Option<bool>,
}

impl FilterSet {
    /// Names of the constraints that the cascade will actually evaluate, in cascade order.
    pub fn active_constraints(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.skills.as_ref().is_some_and(|skills| !skills.is_empty()) {
            names.push("skills");
        }
        if self.location.is_some() {
            names.push("location");
        }
        if self.experience.is_some() {
            names.push("experience");
        }
        if self.education_level.is_some() {
            names.push("educationLevel");
        }
        if self.institution.is_some() {
            names.push("institution");
        }
        if self.min_salary.is_some() {
            names.push("minSalary");
        }
        if self.remote.is_some() {
            names.push("remote");
        }
        if self.immediate_joining == Some(true) {
            names.push("immediateJoining");
        }
        names
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_constraints().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    pub original_index: usize,
    pub score: f64,
    pub record: Record,
}

impl ScoredRecord {
    /// Wraps every record with the same score, for callers that filter without ranking.
    pub fn uniform(records: &[Record], score: f64) -> Vec<ScoredRecord> {
        records
            .iter()
            .enumerate()
            .map(|(original_index, record)| ScoredRecord {
                original_index,
                score,
                record: record.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub results: Vec<ScoredRecord>,
    pub filters: FilterSet,
    pub total_found: usize,
    pub top_score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Jobs,
    Candidates,
    #[default]
    Both,
}

impl SearchScope {
    pub fn includes(self, kind: RecordKind) -> bool {
        match self {
            SearchScope::Jobs => kind == RecordKind::Job,
            SearchScope::Candidates => kind == RecordKind::Candidate,
            SearchScope::Both => matches!(kind, RecordKind::Job | RecordKind::Candidate),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchRequest {
    pub query: String,
    pub filters: FilterSet,
    pub top_k: usize,
}

impl SearchRequest {
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CombinedResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<SearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub kind: RecordKind,
    pub text: String,
    pub id: String,
}
