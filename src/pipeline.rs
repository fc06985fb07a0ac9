use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use scribe_consolidate::{
    Language, LanguageProfile, MalformedRecordError, ProfileError, consolidate,
    consolidate_prepositions, merge_conjugations, render_nouns,
};
use scribe_json::{LoadMode, load_records_with_mode, write_json};
use scribe_types::{NounRecord, RawRecord, VerbEntry, WordKind};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
}

/// The consolidated mapping for one word type, ready to serialize.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedOutput {
    Nouns(BTreeMap<String, NounRecord>),
    Verbs(BTreeMap<String, VerbEntry>),
    Prepositions(BTreeMap<String, String>),
}

impl FormattedOutput {
    pub fn kind(&self) -> WordKind {
        match self {
            FormattedOutput::Nouns(_) => WordKind::Nouns,
            FormattedOutput::Verbs(_) => WordKind::Verbs,
            FormattedOutput::Prepositions(_) => WordKind::Prepositions,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FormattedOutput::Nouns(m) => m.len(),
            FormattedOutput::Verbs(m) => m.len(),
            FormattedOutput::Prepositions(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run the consolidation pass `kind` calls for. Pure: no I/O.
pub fn format_records(
    profile: &LanguageProfile,
    kind: WordKind,
    records: &[RawRecord],
) -> Result<FormattedOutput, FormatError> {
    let output = match kind {
        WordKind::Nouns => {
            let nouns = profile.nouns()?;
            FormattedOutput::Nouns(render_nouns(&consolidate(records, nouns)?, nouns))
        }
        WordKind::Verbs => FormattedOutput::Verbs(merge_conjugations(records, profile.verbs()?)?),
        WordKind::Prepositions => {
            let prepositions = profile.prepositions()?;
            FormattedOutput::Prepositions(consolidate_prepositions(records, prepositions)?)
        }
    };
    Ok(output)
}

/// One (language, word type) formatting unit.
#[derive(Clone, Debug)]
pub struct Job {
    pub profile: LanguageProfile,
    pub kind: WordKind,
    pub input: PathBuf,
    pub output: PathBuf,
    pub load_mode: LoadMode,
}

impl Job {
    pub fn label(&self) -> String {
        format!("{} {}", self.profile.name, self.kind)
    }
}

#[derive(Clone, Debug)]
pub struct JobReport {
    pub language: String,
    pub kind: WordKind,
    pub records: usize,
    pub entries: usize,
    pub output: PathBuf,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct JobFailure {
    pub label: String,
    pub error: anyhow::Error,
}

/// Outcome of [`run_batch`], sorted by job label.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<JobReport>,
    pub failed: Vec<JobFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load, consolidate and write one job.
pub fn run_job(job: &Job) -> Result<JobReport> {
    let start = Instant::now();
    let records = load_records_with_mode(&job.input, job.load_mode)?;
    let output = format_records(&job.profile, job.kind, &records)
        .with_context(|| format!("format {}", job.input.display()))?;
    write_json(&job.output, &output)?;

    let report = JobReport {
        language: job.profile.name.clone(),
        kind: job.kind,
        records: records.len(),
        entries: output.len(),
        output: job.output.clone(),
        elapsed: start.elapsed(),
    };
    info!(
        language = %report.language,
        kind = %report.kind,
        records = report.records,
        entries = report.entries,
        "wrote {} in {} ms",
        report.output.display(),
        report.elapsed.as_millis()
    );
    Ok(report)
}

/// Run jobs on blocking threads, at most `concurrency` at a time.
///
/// A failing job is recorded and the remaining jobs still run.
pub async fn run_batch(jobs: Vec<Job>, concurrency: usize) -> BatchReport {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set: JoinSet<(String, Result<JobReport>)> = JoinSet::new();

    for job in jobs {
        let sem = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let label = job.label();
            let _permit = match sem.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return (label, Err(anyhow!("job queue closed: {e}"))),
            };
            let result = match tokio::task::spawn_blocking(move || run_job(&job)).await {
                Ok(result) => result,
                Err(e) => Err(anyhow!("job task failed: {e}")),
            };
            (label, result)
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((_, Ok(done))) => report.completed.push(done),
            Ok((label, Err(error))) => {
                error!(job = %label, "{error:#}");
                report.failed.push(JobFailure { label, error });
            }
            Err(e) => report.failed.push(JobFailure {
                label: "<unknown>".to_string(),
                error: anyhow!("job task failed: {e}"),
            }),
        }
    }

    report
        .completed
        .sort_by(|a, b| (&a.language, a.kind).cmp(&(&b.language, b.kind)));
    report.failed.sort_by(|a, b| a.label.cmp(&b.label));
    info!(
        completed = report.completed.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    report
}

/// Find every `<data>/<Language>/<kind>/<kind>Queried.json` a built-in profile
/// can format. An empty `languages` slice means all of them.
pub fn discover_jobs(
    data_dir: &Path,
    output_dir: &Path,
    languages: &[Language],
    load_mode: LoadMode,
) -> Vec<Job> {
    let selected: &[Language] = if languages.is_empty() {
        &Language::ALL
    } else {
        languages
    };

    let mut jobs = Vec::new();
    for &language in selected {
        let profile = language.profile();
        for kind in WordKind::ALL {
            if !profile.supports(kind) {
                continue;
            }
            let input = data_dir
                .join(language.as_str())
                .join(kind.as_str())
                .join(kind.queried_file_name());
            if !input.is_file() {
                debug!(path = %input.display(), "no queried data, skipping");
                continue;
            }
            jobs.push(Job {
                profile: profile.clone(),
                kind,
                input,
                output: output_dir
                    .join(language.as_str())
                    .join(kind.output_file_name()),
                load_mode,
            });
        }
    }
    jobs
}
