use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use talent_match_core::{
    load_records, suggestions, FilterSet, HybridMatcher, Record, RecordCollection, SearchRequest,
    SearchResult, SearchScope, Vocabulary,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "talent-match", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON file or folder of JSON files holding job and candidate records
    #[arg(
        long,
        global = true,
        env = "TALENT_MATCH_RECORDS",
        default_value = "data/demo-records.json"
    )]
    records: PathBuf,

    /// JSON file overriding the built-in keyword tables
    #[arg(long, global = true, env = "TALENT_MATCH_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    /// Keep job postings marked inactive
    #[arg(long, global = true, default_value_t = false)]
    include_inactive: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Jobs,
    Candidates,
    Both,
}

impl From<ScopeArg> for SearchScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Jobs => SearchScope::Jobs,
            ScopeArg::Candidates => SearchScope::Candidates,
            ScopeArg::Both => SearchScope::Both,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Extract filters from a free-text query, rank records and apply the filters.
    Search {
        /// Free-text query, e.g. "python developers in Bangalore with 3 years experience"
        #[arg(long)]
        query: String,
        /// Number of results to return.
        #[arg(long, default_value = "20")]
        top_k: usize,
        /// Search jobs and candidates as separate collections.
        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,
        /// Print the extracted filters and score details.
        #[arg(long, default_value_t = false)]
        explain: bool,
    },
    /// Apply explicit filters to every record without ranking.
    Filter {
        /// Comma separated skills; any one must match.
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
        #[arg(long)]
        location: Option<String>,
        /// Minimum years of experience.
        #[arg(long)]
        experience: Option<u32>,
        #[arg(long)]
        education_level: Option<String>,
        #[arg(long)]
        institution: Option<String>,
        #[arg(long)]
        min_salary: Option<u64>,
        #[arg(long)]
        remote: Option<bool>,
        #[arg(long, default_value_t = false)]
        immediate_joining: bool,
        #[arg(long, default_value = "20")]
        top_k: usize,
    },
    /// Print the filters extracted from a query.
    Extract {
        #[arg(long)]
        query: String,
    },
    /// Typeahead suggestions for a prefix.
    Suggest {
        #[arg(long)]
        prefix: String,
        /// Maximum suggestions per record kind.
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Print the active vocabulary as JSON.
    Vocabulary,
}

fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "talent-match boot"
    );

    let vocabulary = match &cli.vocabulary {
        Some(path) => Vocabulary::from_path(path)
            .with_context(|| format!("loading vocabulary from {}", path.display()))?,
        None => Vocabulary::default(),
    };

    match cli.command {
        Command::Vocabulary => {
            println!("{}", serde_json::to_string_pretty(&vocabulary)?);
        }
        Command::Extract { query } => {
            let matcher = HybridMatcher::new(vocabulary);
            let filters = matcher.extract_filters(&query);
            println!("{}", serde_json::to_string_pretty(&filters)?);
        }
        Command::Search {
            query,
            top_k,
            scope,
            explain,
        } => {
            let records = read_records(&cli.records, cli.include_inactive)?;
            let matcher = HybridMatcher::new(vocabulary);
            let request = SearchRequest {
                query,
                filters: FilterSet::default(),
                top_k,
            };

            match scope {
                Some(scope) => {
                    let combined =
                        matcher.search_collections(&request, records.records(), scope.into());
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&combined)?);
                    } else {
                        if let Some(jobs) = &combined.jobs {
                            println!("== jobs");
                            print_result(jobs, explain);
                        }
                        if let Some(candidates) = &combined.candidates {
                            println!("== candidates");
                            print_result(candidates, explain);
                        }
                    }
                }
                None => {
                    let result = matcher.run(&request, records.records());
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    } else {
                        println!("query: {}", request.query);
                        print_result(&result, explain);
                    }
                }
            }
        }
        Command::Filter {
            skills,
            location,
            experience,
            education_level,
            institution,
            min_salary,
            remote,
            immediate_joining,
            top_k,
        } => {
            let records = read_records(&cli.records, cli.include_inactive)?;
            let skills: Vec<String> = skills
                .into_iter()
                .map(|skill| skill.trim().to_string())
                .filter(|skill| !skill.is_empty())
                .collect();
            let filters = FilterSet {
                skills: (!skills.is_empty()).then_some(skills),
                location,
                experience,
                education_level,
                institution,
                min_salary,
                remote,
                immediate_joining: immediate_joining.then_some(true),
            };

            let matcher = HybridMatcher::new(vocabulary);
            let result = matcher.filter_records(records.records(), &filters, top_k);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result, true);
            }
        }
        Command::Suggest { prefix, limit } => {
            let records = read_records(&cli.records, cli.include_inactive)?;
            let found = suggestions(&prefix, records.records(), limit)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                for suggestion in found {
                    println!("[{:?}] {} ({})", suggestion.kind, suggestion.text, suggestion.id);
                }
            }
        }
    }

    Ok(())
}

fn read_records(path: &Path, include_inactive: bool) -> anyhow::Result<RecordCollection> {
    let report = load_records(path)
        .with_context(|| format!("loading records from {}", path.display()))?;

    if !report.skipped_files.is_empty() {
        warn!(
            "skipped_files={} for path={}",
            report.skipped_files.len(),
            path.display()
        );
        for skipped in &report.skipped_files {
            warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped record file");
        }
    }

    let records = if include_inactive {
        report.records
    } else {
        report.records.active_only()
    };
    info!(path = %path.display(), record_count = records.len(), "records loaded");

    Ok(records)
}

fn print_result(result: &SearchResult, explain: bool) {
    if explain {
        let filters = serde_json::to_string(&result.filters).unwrap_or_default();
        println!("explain: filters={filters}");
        println!(
            "explain: constraints={:?} top_score={:.4}",
            result.filters.active_constraints(),
            result.top_score
        );
    }

    println!(
        "total_found={} showing={}",
        result.total_found,
        result.results.len()
    );
    for hit in &result.results {
        println!(
            "[{:?}] score={:.4} index={} id={}",
            hit.record.kind, hit.score, hit.original_index, hit.record.id
        );
        println!("  {}", describe(&hit.record));
    }
}

fn describe(record: &Record) -> String {
    let mut parts = Vec::new();
    if let Some(title) = &record.title {
        parts.push(match &record.company {
            Some(company) => format!("{title} at {company}"),
            None => title.clone(),
        });
    }
    if let Some(location) = &record.location {
        parts.push(location.clone());
    }
    if !record.skills.is_empty() {
        parts.push(format!("skills: {}", record.skills.join(", ")));
    }
    if let Some(years) = record.experience_years {
        parts.push(format!("{years} yrs"));
    }
    parts.join(" | ")
}
