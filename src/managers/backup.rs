//! Backup manager - orchestrates backup execution
//!
//! Jobs run one after another in configuration order. A failing job never
//! stops the batch: every job ends as exactly one `BackupOutcome`.

use crate::config::{BackupJob, DatabaseType};
use crate::error::{BackupError, ErrorKind};
use crate::strategies;
use crate::utils::executor::{CommandExecutor, RealExecutor};
use crate::utils::size;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Why a job failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Result of one backup job
#[derive(Debug, Clone, Serialize)]
pub struct BackupOutcome {
    database_type: String,
    database: String,
    success: bool,
    artifact_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<Failure>,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    duration: Duration,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl BackupOutcome {
    pub fn succeeded(job: &BackupJob, artifact_path: PathBuf, size: String, duration: Duration) -> Self {
        Self {
            database_type: job.engine.clone(),
            database: job.connection.database.clone(),
            success: true,
            artifact_path,
            size: Some(size),
            failure: None,
            duration,
        }
    }

    pub fn failed(job: &BackupJob, artifact_path: PathBuf, err: &BackupError, duration: Duration) -> Self {
        Self {
            database_type: job.engine.clone(),
            database: job.connection.database.clone(),
            success: false,
            artifact_path,
            size: None,
            failure: Some(Failure {
                kind: err.kind(),
                message: err.to_string(),
            }),
            duration,
        }
    }

    /// Database type as configured (may be one the tool does not support)
    pub fn database_type(&self) -> &str {
        &self.database_type
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Intended artifact location; empty when the type was not recognised
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Hooks called as a batch progresses
pub trait BatchObserver {
    fn job_started(&mut self, _index: usize, _job: &BackupJob) {}
    fn job_finished(&mut self, _index: usize, _outcome: &BackupOutcome) {}
}

impl BatchObserver for () {}

pub struct BackupManager {
    executor: Arc<dyn CommandExecutor>,
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupManager {
    /// Create a manager that spawns real processes
    pub fn new() -> Self {
        Self::with_executor(Arc::new(RealExecutor::new()))
    }

    pub fn with_executor(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Run every job in order and collect one outcome per job
    pub fn run(&self, jobs: &[BackupJob]) -> Vec<BackupOutcome> {
        self.run_observed(jobs, &mut ())
    }

    pub fn run_observed(&self, jobs: &[BackupJob], observer: &mut dyn BatchObserver) -> Vec<BackupOutcome> {
        info!("Starting backup batch of {} database(s)", jobs.len());

        let mut outcomes = Vec::with_capacity(jobs.len());
        for (index, job) in jobs.iter().enumerate() {
            observer.job_started(index, job);
            let outcome = self.backup_job(job);
            observer.job_finished(index, &outcome);
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|o| !o.success()).count();
        info!(
            "Backup batch finished: {} succeeded, {} failed",
            outcomes.len() - failed,
            failed
        );
        outcomes
    }

    /// Back up a single database
    pub fn backup_job(&self, job: &BackupJob) -> BackupOutcome {
        let start_time = Instant::now();
        info!(
            "Backing up {} database '{}' via {}",
            job.engine, job.connection.database, job.method
        );

        let db_type = match job.database_type() {
            Ok(db_type) => db_type,
            Err(e) => return self.finish_failed(job, PathBuf::new(), e, start_time),
        };
        let destination = job.destination(db_type);

        match self.execute_job(job, db_type, &destination) {
            Ok(size) => {
                let duration = start_time.elapsed();
                info!(
                    "Backup of '{}' completed: {:?} ({}) in {:.2}s",
                    job.connection.database,
                    destination,
                    size,
                    duration.as_secs_f64()
                );
                BackupOutcome::succeeded(job, destination, size, duration)
            }
            Err(e) => self.finish_failed(job, destination, e, start_time),
        }
    }

    fn execute_job(&self, job: &BackupJob, db_type: DatabaseType, destination: &Path) -> Result<String, BackupError> {
        let method = job.execution_method()?;
        job.check_credentials()?;
        let strategy = strategies::strategy_for(db_type, method);
        let plan = strategy.build(job)?;

        let type_dir = job.type_dir(db_type);
        fs::create_dir_all(&type_dir).map_err(|source| BackupError::Directory {
            path: type_dir.clone(),
            source,
        })?;

        info!("Running {} via {}", strategy.name(), method);
        strategy.execute(&plan, self.executor.as_ref())?;

        size::measure(self.executor.as_ref(), destination, db_type.produces_directory())
    }

    fn finish_failed(&self, job: &BackupJob, destination: PathBuf, err: BackupError, start_time: Instant) -> BackupOutcome {
        error!("Backup of '{}' failed: {}", job.connection.database, err);
        BackupOutcome::failed(job, destination, &err, start_time.elapsed())
    }
}
