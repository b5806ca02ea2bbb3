use crate::error::BackupError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Format of the batch timestamp used in artifact names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub databases: Vec<DatabaseEntry>,
}

/// Global configuration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Root of the local backup tree
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Scratch directory inside exec targets for staged exports
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,

    /// Default execution method
    #[serde(default = "default_method")]
    pub method: String,

    /// Cluster namespace for kubectl-exec
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Logging configuration
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: u32,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            scratch_dir: default_scratch_dir(),
            method: default_method(),
            namespace: default_namespace(),
            log_directory: default_log_directory(),
            log_level: default_log_level(),
            log_max_files: default_log_max_files(),
            log_format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// One configured database (raw, before resolution)
///
/// `type` and `method` stay strings so an unsupported value fails only its
/// own job instead of the whole file.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct DatabaseEntry {
    #[serde(rename = "type")]
    pub db_type: String,

    pub database: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Password sources (at most one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,

    /// docker-exec target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// kubectl-exec target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,

    /// Per-database method override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl fmt::Debug for DatabaseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseEntry")
            .field("db_type", &self.db_type)
            .field("database", &self.database)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("version", &self.version)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password_env", &self.password_env)
            .field("password_file", &self.password_file)
            .field("container", &self.container)
            .field("pod", &self.pod)
            .field("method", &self.method)
            .finish()
    }
}

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Postgres,
    Mysql,
    Mariadb,
    Mongodb,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 4] = [
        DatabaseType::Postgres,
        DatabaseType::Mysql,
        DatabaseType::Mariadb,
        DatabaseType::Mongodb,
    ];

    /// Name used for the per-type backup directory
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Mariadb => "mariadb",
            DatabaseType::Mongodb => "mongodb",
        }
    }

    /// Human readable engine name
    pub fn label(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "PostgreSQL",
            DatabaseType::Mysql => "MySQL",
            DatabaseType::Mariadb => "MariaDB",
            DatabaseType::Mongodb => "MongoDB",
        }
    }

    /// Whether the artifact is a directory tree rather than a single dump file
    pub fn produces_directory(&self) -> bool {
        matches!(self, DatabaseType::Mongodb)
    }

    /// Container image repository for docker-run
    pub fn image(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Mariadb => "mariadb",
            DatabaseType::Mongodb => "mongo",
        }
    }

    /// Connection defaults offered by the interactive prompts and used to
    /// fill fields left out of the configuration file
    pub fn defaults(&self) -> EngineDefaults {
        match self {
            DatabaseType::Postgres => EngineDefaults {
                host: "postgres",
                user: "postgres",
                version: "15",
                container: "test-postgres",
                pod: "postgres-0",
            },
            DatabaseType::Mysql => EngineDefaults {
                host: "mysql",
                user: "root",
                version: "8",
                container: "test-mysql",
                pod: "mysql-0",
            },
            DatabaseType::Mariadb => EngineDefaults {
                host: "mariadb",
                user: "root",
                version: "11",
                container: "test-mariadb",
                pod: "mariadb-0",
            },
            DatabaseType::Mongodb => EngineDefaults {
                host: "mongodb",
                user: "",
                version: "7",
                container: "test-mongodb",
                pod: "mongodb-0",
            },
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DatabaseType::Postgres),
            "mysql" => Ok(DatabaseType::Mysql),
            "mariadb" => Ok(DatabaseType::Mariadb),
            "mongodb" | "mongo" => Ok(DatabaseType::Mongodb),
            _ => Err(BackupError::UnknownDatabaseType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineDefaults {
    pub host: &'static str,
    pub user: &'static str,
    pub version: &'static str,
    pub container: &'static str,
    pub pod: &'static str,
}

/// How the dump utility is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMethod {
    /// Disposable container started for the backup
    DockerRun,
    /// Exec into an already running container
    DockerExec,
    /// Exec into a running cluster pod
    KubectlExec,
}

impl ExecutionMethod {
    pub const ALL: [ExecutionMethod; 3] = [
        ExecutionMethod::DockerRun,
        ExecutionMethod::DockerExec,
        ExecutionMethod::KubectlExec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMethod::DockerRun => "docker-run",
            ExecutionMethod::DockerExec => "docker-exec",
            ExecutionMethod::KubectlExec => "kubectl-exec",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExecutionMethod::DockerRun => "Use temporary container",
            ExecutionMethod::DockerExec => "Exec into existing Docker container",
            ExecutionMethod::KubectlExec => "Exec into Kubernetes pod",
        }
    }

    /// External program this method drives
    pub fn program(&self) -> &'static str {
        match self {
            ExecutionMethod::DockerRun | ExecutionMethod::DockerExec => "docker",
            ExecutionMethod::KubectlExec => "kubectl",
        }
    }
}

impl fmt::Display for ExecutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMethod {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "docker-run" | "ephemeral-container" => Ok(ExecutionMethod::DockerRun),
            "docker-exec" | "exec-into-container" => Ok(ExecutionMethod::DockerExec),
            "kubectl-exec" | "exec-into-pod" => Ok(ExecutionMethod::KubectlExec),
            _ => Err(BackupError::UnknownMethod(s.to_string())),
        }
    }
}

/// Resolved connection attributes for one database
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub version: String,
    pub container: String,
    pub pod: String,
}

impl fmt::Debug for ConnectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ConnectionSpec")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &password)
            .field("database", &self.database)
            .field("version", &self.version)
            .field("container", &self.container)
            .field("pod", &self.pod)
            .finish()
    }
}

/// A fully resolved unit of work: one database, one method, one batch timestamp
#[derive(Debug, Clone)]
pub struct BackupJob {
    /// Database type as configured
    pub engine: String,
    /// Execution method as configured
    pub method: String,
    pub connection: ConnectionSpec,
    /// Root of the local backup tree
    pub backup_dir: PathBuf,
    pub timestamp: DateTime<Local>,
    /// Only meaningful for kubectl-exec
    pub namespace: String,
    /// Only meaningful for staged exports
    pub scratch_dir: String,
    /// Set when the password source could not be read; fails only this job
    pub credential_error: Option<String>,
}

impl BackupJob {
    pub fn database_type(&self) -> Result<DatabaseType, BackupError> {
        self.engine.parse()
    }

    pub fn execution_method(&self) -> Result<ExecutionMethod, BackupError> {
        self.method.parse()
    }

    /// Fail if the password for this job could not be resolved
    pub fn check_credentials(&self) -> Result<(), BackupError> {
        match &self.credential_error {
            Some(message) => Err(BackupError::Credential {
                database: self.connection.database.clone(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Batch timestamp as it appears in artifact names
    pub fn stamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Local directory holding every artifact of the given type
    pub fn type_dir(&self, db_type: DatabaseType) -> PathBuf {
        self.backup_dir.join(db_type.as_str())
    }

    /// Where the artifact for this job lands
    pub fn destination(&self, db_type: DatabaseType) -> PathBuf {
        let type_dir = self.type_dir(db_type);
        if db_type.produces_directory() {
            type_dir.join(self.stamp())
        } else {
            type_dir.join(format!("{}_{}.sql", self.connection.database, self.stamp()))
        }
    }
}

// Default value functions

fn default_backup_dir() -> PathBuf { PathBuf::from("backup") }
fn default_scratch_dir() -> String { "/tmp/db-backups".to_string() }
fn default_method() -> String { ExecutionMethod::DockerExec.as_str().to_string() }
fn default_namespace() -> String { "default".to_string() }
fn default_log_directory() -> PathBuf { PathBuf::from("~/logs") }
fn default_log_level() -> String { "info".to_string() }
fn default_log_max_files() -> u32 { 10 }
