//! MongoDB directory export
//!
//! `mongodump` writes a directory tree, so it cannot be captured from
//! stdout. Ephemeral containers dump straight into the mounted type
//! directory. Exec targets stage the export under the scratch directory,
//! which is then copied out and removed.

use super::plan::{CommandPlan, StagedExport};
use super::BackupStrategy;
use crate::config::{BackupJob, DatabaseType, ExecutionMethod};
use crate::error::BackupError;
use crate::utils::transport::{Transport, MOUNT_POINT};

const PROGRAM: &str = "mongodump";

pub struct ExportStrategy {
    method: ExecutionMethod,
}

impl ExportStrategy {
    pub fn new(method: ExecutionMethod) -> Self {
        Self { method }
    }
}

fn mongodump(host: &str, database: &str, out: &str) -> Vec<String> {
    [PROGRAM, "--host", host, "--db", database, "--out", out]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl BackupStrategy for ExportStrategy {
    fn build(&self, job: &BackupJob) -> Result<CommandPlan, BackupError> {
        let db_type = DatabaseType::Mongodb;
        let transport = Transport::for_job(self.method, db_type, job)?;
        let conn = &job.connection;
        let destination = job.destination(db_type);
        let host = transport.dump_host(&conn.host);

        let scratch = format!("{}/{}", job.scratch_dir.trim_end_matches('/'), job.stamp());
        let exported = format!("{}/{}", scratch, conn.database);

        match transport.copy_out(&exported, &destination, &conn.database) {
            Some(copy) => Ok(CommandPlan::Staged(StagedExport {
                create: transport.exec(&mongodump(host, &conn.database, &scratch), None),
                copy,
                cleanup: transport.remove(&scratch),
                target: transport.describe(),
                destination,
            })),
            // Nothing to copy: the container writes into the mounted type directory
            None => {
                let out = format!("{}/{}", MOUNT_POINT, job.stamp());
                Ok(CommandPlan::Mounted {
                    command: transport.exec(&mongodump(host, &conn.database, &out), None),
                    context: transport.failure_context().to_string(),
                    destination,
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        PROGRAM
    }
}
