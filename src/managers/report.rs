//! Console and JSON reporting of backup outcomes

use super::backup::{BackupOutcome, BatchObserver};
use crate::config::{BackupJob, ExecutionMethod};
use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;

/// Prints batch progress and a final summary as plain text
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// What is about to run
    pub fn print_plan_summary(&mut self, jobs: &[BackupJob]) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "=== Configuration Summary ===")?;
        if let Some(first) = jobs.first() {
            writeln!(out, "Timestamp: {}", first.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
            writeln!(out, "Backup Directory: {}", first.backup_dir.display())?;
        }
        writeln!(out, "\nDatabases to backup:")?;
        for (i, job) in jobs.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} - {} via {}",
                i + 1,
                job.engine,
                job.connection.database,
                job.method
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Final counts and the list of artifacts
    pub fn print_summary(&mut self, outcomes: &[BackupOutcome]) -> Result<()> {
        let succeeded = outcomes.iter().filter(|o| o.success()).count();
        let failed = outcomes.len() - succeeded;

        let out = &mut self.out;
        writeln!(out, "========================================")?;
        writeln!(out, "Backup Process Completed")?;
        writeln!(out, "========================================")?;
        writeln!(out, "\nResults:")?;
        writeln!(out, "  Successful: {}", succeeded)?;
        if failed > 0 {
            writeln!(out, "  Failed: {}", failed)?;
        }

        writeln!(out, "\nBackup files:")?;
        for outcome in outcomes {
            match outcome.failure() {
                None => writeln!(
                    out,
                    "  ✓ {}: {} ({})",
                    outcome.database_type(),
                    outcome.artifact_path().display(),
                    outcome.size().unwrap_or_default()
                )?,
                Some(failure) => writeln!(
                    out,
                    "  ✗ {} {}: {}",
                    outcome.database_type(),
                    outcome.database(),
                    failure.message
                )?,
            }
        }
        Ok(())
    }
}

impl<W: Write> BatchObserver for ConsoleReporter<W> {
    fn job_started(&mut self, _index: usize, job: &BackupJob) {
        let _ = writeln!(
            self.out,
            "[{}] Starting backup of '{}'...",
            job.engine.to_uppercase(),
            job.connection.database
        );
        let _ = writeln!(self.out, "  Method: {}", job.method);
        match job.execution_method() {
            Ok(ExecutionMethod::DockerExec) => {
                let _ = writeln!(self.out, "  Container: {}", job.connection.container);
            }
            Ok(ExecutionMethod::KubectlExec) => {
                let _ = writeln!(self.out, "  Pod: {}/{}", job.namespace, job.connection.pod);
            }
            _ => {
                let _ = writeln!(self.out, "  Host: {}", job.connection.host);
            }
        }
    }

    fn job_finished(&mut self, _index: usize, outcome: &BackupOutcome) {
        let took = format_duration(outcome.duration());
        let _ = match outcome.failure() {
            None => writeln!(
                self.out,
                "✓ Backup completed: {} ({}) [{}]\n",
                outcome.artifact_path().display(),
                outcome.size().unwrap_or_default(),
                took
            ),
            Some(failure) => writeln!(self.out, "✗ Backup failed: {} [{}]\n", failure.message, took),
        };
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

/// Write the outcome list as pretty JSON
pub fn write_json<W: Write>(mut out: W, outcomes: &[BackupOutcome]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, outcomes).context("Failed to serialize outcomes")?;
    writeln!(out)?;
    Ok(())
}
