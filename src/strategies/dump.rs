//! Single-file dump strategies
//!
//! PostgreSQL, MySQL and MariaDB all produce one SQL file on the dump tool's
//! stdout. Whatever the transport, the plan is a single command whose stdout
//! is written to `{type_dir}/{database}_{timestamp}.sql`.

use super::plan::CommandPlan;
use super::BackupStrategy;
use crate::config::{BackupJob, DatabaseType, ExecutionMethod};
use crate::error::BackupError;
use crate::utils::transport::{Secret, Transport};

/// Vendor dump utility for a file-producing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpTool {
    PgDump,
    MysqlDump,
    MariadbDump,
}

impl DumpTool {
    pub fn program(&self) -> &'static str {
        match self {
            DumpTool::PgDump => "pg_dump",
            DumpTool::MysqlDump => "mysqldump",
            DumpTool::MariadbDump => "mariadb-dump",
        }
    }

    pub fn database_type(&self) -> DatabaseType {
        match self {
            DumpTool::PgDump => DatabaseType::Postgres,
            DumpTool::MysqlDump => DatabaseType::Mysql,
            DumpTool::MariadbDump => DatabaseType::Mariadb,
        }
    }

    /// Environment variable the tool reads its password from
    pub fn password_var(&self) -> &'static str {
        match self {
            DumpTool::PgDump => "PGPASSWORD",
            DumpTool::MysqlDump | DumpTool::MariadbDump => "MYSQL_PWD",
        }
    }

    fn user_flag(&self) -> &'static str {
        match self {
            DumpTool::PgDump => "-U",
            DumpTool::MysqlDump | DumpTool::MariadbDump => "-u",
        }
    }

    /// Tool argv; the user flag is left out when no user is configured
    pub fn argv(&self, host: &str, user: &str, database: &str) -> Vec<String> {
        let mut argv = vec![self.program().to_string(), "-h".to_string(), host.to_string()];
        if !user.is_empty() {
            argv.push(self.user_flag().to_string());
            argv.push(user.to_string());
        }
        argv.push(database.to_string());
        argv
    }
}

pub struct DumpStrategy {
    tool: DumpTool,
    method: ExecutionMethod,
}

impl DumpStrategy {
    pub fn new(tool: DumpTool, method: ExecutionMethod) -> Self {
        Self { tool, method }
    }
}

impl BackupStrategy for DumpStrategy {
    fn build(&self, job: &BackupJob) -> Result<CommandPlan, BackupError> {
        let db_type = self.tool.database_type();
        let transport = Transport::for_job(self.method, db_type, job)?;
        let conn = &job.connection;

        let argv = self.tool.argv(transport.dump_host(&conn.host), &conn.user, &conn.database);
        let secret = Secret {
            var: self.tool.password_var(),
            value: &conn.password,
        };

        Ok(CommandPlan::Capture {
            command: transport.exec(&argv, Some(secret)),
            context: transport.failure_context().to_string(),
            destination: job.destination(db_type),
        })
    }

    fn name(&self) -> &'static str {
        self.tool.program()
    }
}
