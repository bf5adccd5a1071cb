use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use bos_parser::{transform_file, RoomReference, StagedFile, TransformJob};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action_log::ActionLog;
use crate::error::Result;
use crate::workspace::list_files;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CleanStatus {
    NoFile,
    AlreadyExist,
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JobFailure {
    pub target: String,
    pub error: String,
}

/// Result of one clean run, shaped for the dashboard API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanOutcome {
    pub status: CleanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_exist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<JobFailure>,
    pub message: String,
    pub log: Vec<String>,
}

impl CleanOutcome {
    fn new(status: CleanStatus, message: impl Into<String>, log: &ActionLog) -> Self {
        Self {
            status,
            created: None,
            already_exist: None,
            failures: Vec::new(),
            message: message.into(),
            log: log.entries(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CleanRequest<'a> {
    pub staging_dir: &'a Path,
    pub clean_dir: &'a Path,
    pub reference_file: &'a Path,
    pub overwrite: bool,
}

/// Classify every staged file, refuse the whole batch when a target already
/// exists (unless overwriting), then transform each job independently.
pub fn run_clean(request: &CleanRequest<'_>, log: &ActionLog) -> CleanOutcome {
    match prepare(request) {
        Ok(Prepared::NoJobs) => {
            log.record("Nothing to transform.");
            CleanOutcome::new(CleanStatus::NoFile, "No file to process.", log)
        }
        Ok(Prepared::Collisions(collisions)) => {
            log.record(&format!("Collision on: {}", collisions.join(", ")));
            let mut outcome = CleanOutcome::new(
                CleanStatus::AlreadyExist,
                "Some files already exist in clean.",
                log,
            );
            outcome.already_exist = Some(collisions);
            outcome
        }
        Ok(Prepared::Jobs(jobs)) => execute(request, &jobs, log),
        Err(err) => {
            warn!(error = %err, "clean run could not start");
            log.record(&format!("Clean failed: {err}"));
            CleanOutcome::new(CleanStatus::Error, err.to_string(), log)
        }
    }
}

enum Prepared {
    NoJobs,
    Collisions(Vec<String>),
    Jobs(Vec<TransformJob>),
}

fn prepare(request: &CleanRequest<'_>) -> Result<Prepared> {
    fs::create_dir_all(request.staging_dir)?;
    fs::create_dir_all(request.clean_dir)?;

    let jobs = plan_jobs(request.staging_dir)?;
    if jobs.is_empty() {
        return Ok(Prepared::NoJobs);
    }

    let existing = list_files(request.clean_dir)?;
    let collisions = find_collisions(&jobs, &existing);
    if !collisions.is_empty() && !request.overwrite {
        return Ok(Prepared::Collisions(collisions));
    }
    Ok(Prepared::Jobs(jobs))
}

/// Transform jobs for every recognised file in `staging_dir`, in filename order.
pub fn plan_jobs(staging_dir: &Path) -> Result<Vec<TransformJob>> {
    let jobs = list_files(staging_dir)?
        .into_iter()
        .filter_map(|name| StagedFile::inspect(staging_dir.join(name)).into_job())
        .collect();
    Ok(jobs)
}

/// Targets that already exist among `existing` clean filenames, compared case-insensitively.
pub fn find_collisions(jobs: &[TransformJob], existing: &[String]) -> Vec<String> {
    let existing: HashSet<String> = existing.iter().map(|name| name.to_lowercase()).collect();
    jobs.iter()
        .filter(|job| existing.contains(&job.target().to_lowercase()))
        .map(|job| job.target().to_string())
        .collect()
}

fn execute(request: &CleanRequest<'_>, jobs: &[TransformJob], log: &ActionLog) -> CleanOutcome {
    warn_shared_targets(jobs);
    let rooms = RoomReference::load(request.reference_file);

    let mut created = Vec::with_capacity(jobs.len());
    let mut failures = Vec::new();
    for job in jobs {
        let target = job.target();
        let dest = request.clean_dir.join(target);
        let existed = dest.exists();
        match transform_file(job.kind(), job.source(), &dest, &rooms) {
            Ok(summary) => {
                debug!(
                    source = %job.source().display(),
                    clean_file = target,
                    kind = %summary.kind,
                    rows_read = summary.rows_read,
                    rows_written = summary.rows_written,
                    "transformed staged file"
                );
                let verb = if request.overwrite {
                    "Overwritten/cleaned"
                } else {
                    "Imported/cleaned"
                };
                log.record(&format!("{verb}: {target}"));
                created.push(target.to_string());
            }
            Err(err) => {
                warn!(
                    source = %job.source().display(),
                    clean_file = target,
                    error = %err,
                    "transform failed"
                );
                if !existed {
                    let _ = fs::remove_file(&dest);
                }
                log.record(&format!("Error on {target}: {err}"));
                failures.push(JobFailure {
                    target: target.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    if !created.is_empty() {
        log.record(&format!("Clean succeeded: {}", created.join(", ")));
    }
    info!(
        created = created.len(),
        failed = failures.len(),
        overwrite = request.overwrite,
        "clean run finished"
    );

    let message = if failures.is_empty() {
        format!("{} file(s) cleaned.", created.len())
    } else {
        format!(
            "{} file(s) cleaned, {} failed.",
            created.len(),
            failures.len()
        )
    };
    let mut outcome = CleanOutcome::new(CleanStatus::Ok, message, log);
    outcome.created = Some(created);
    outcome.failures = failures;
    outcome
}

// Jobs sharing a target are not gated against each other; the later one wins.
fn warn_shared_targets(jobs: &[TransformJob]) {
    let mut by_target: HashMap<String, Vec<&Path>> = HashMap::new();
    for job in jobs {
        by_target
            .entry(job.target().to_lowercase())
            .or_default()
            .push(job.source());
    }
    for (target, sources) in by_target.into_iter().filter(|(_, s)| s.len() > 1) {
        warn!(
            clean_file = %target,
            sources = ?sources,
            "several staged files map to the same clean file; the last one processed wins"
        );
    }
}
