use super::types::*;
use super::expand_tilde;
use crate::managers::logging::parse_level;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Read only the `[global]` section, for callers that supply their own databases
pub fn load_global<P: AsRef<Path>>(path: P) -> Result<GlobalConfig> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    check_log_level(&config.global)?;
    Ok(config.global)
}

/// Validate the configuration
///
/// Only structure is checked here. Unsupported database types and methods
/// are left for the matrix to reject job by job.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.databases.is_empty() {
        return Err(ConfigError::ValidationError(
            "No databases defined".to_string(),
        ));
    }

    check_log_level(&config.global)?;

    for (index, entry) in config.databases.iter().enumerate() {
        validate_entry(index, entry)?;
    }

    Ok(())
}

fn check_log_level(global: &GlobalConfig) -> Result<()> {
    if parse_level(&global.log_level).is_none() {
        return Err(ConfigError::ValidationError(format!(
            "Unknown log level: {}",
            global.log_level
        )));
    }
    Ok(())
}

/// Check that a database name can be used in an artifact file name
pub fn check_database_name(name: &str) -> std::result::Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("database name is empty".to_string());
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(format!("database name '{}' must not contain path separators", name));
    }
    Ok(())
}

fn validate_entry(index: usize, entry: &DatabaseEntry) -> Result<()> {
    if let Err(message) = check_database_name(&entry.database) {
        return Err(ConfigError::ValidationError(format!(
            "databases[{}] ({}): {}",
            index, entry.db_type, message
        )));
    }

    let sources = [
        entry.password.is_some(),
        entry.password_env.is_some(),
        entry.password_file.is_some(),
    ];
    if sources.iter().filter(|set| **set).count() > 1 {
        return Err(ConfigError::ValidationError(format!(
            "databases[{}] ({}): set only one of password, password_env, password_file",
            index, entry.database
        )));
    }

    Ok(())
}

/// Resolve the password for an entry from whichever source it names
fn resolve_password(entry: &DatabaseEntry) -> std::result::Result<String, String> {
    if let Some(ref password) = entry.password {
        return Ok(password.clone());
    }

    if let Some(ref var) = entry.password_env {
        return std::env::var(var).map_err(|_| format!("environment variable {} is not set", var));
    }

    if let Some(ref file) = entry.password_file {
        let path = expand_tilde(file);
        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("cannot read password file {:?}: {}", path, e))?;
        return Ok(contents.trim_end_matches(['\r', '\n']).to_string());
    }

    Ok(String::new())
}

/// Resolve one entry into a job, filling engine defaults for omitted fields
///
/// An unreadable password source does not stop resolution; it is kept on
/// the job and fails that job alone when it runs.
pub fn resolve_job(
    entry: &DatabaseEntry,
    global: &GlobalConfig,
    timestamp: DateTime<Local>,
) -> BackupJob {
    // Unknown types get no defaults; their job fails in the matrix
    let defaults = entry.db_type.parse::<DatabaseType>().ok().map(|t| t.defaults());
    let pick = |value: &Option<String>, default: fn(&EngineDefaults) -> &'static str| {
        value
            .clone()
            .or_else(|| defaults.as_ref().map(|d| default(d).to_string()))
            .unwrap_or_default()
    };

    let (password, credential_error) = match resolve_password(entry) {
        Ok(password) => (password, None),
        Err(message) => (String::new(), Some(message)),
    };

    let connection = ConnectionSpec {
        host: pick(&entry.host, |d| d.host),
        user: pick(&entry.user, |d| d.user),
        password,
        database: entry.database.clone(),
        version: pick(&entry.version, |d| d.version),
        container: entry.container.clone().unwrap_or_default(),
        pod: entry.pod.clone().unwrap_or_default(),
    };

    BackupJob {
        engine: entry.db_type.clone(),
        method: entry.method.clone().unwrap_or_else(|| global.method.clone()),
        connection,
        backup_dir: expand_tilde(&global.backup_dir),
        timestamp,
        namespace: global.namespace.clone(),
        scratch_dir: global.scratch_dir.clone(),
        credential_error,
    }
}

/// Resolve all configured databases, in configuration order, sharing one timestamp
pub fn resolve_jobs(config: &Config, timestamp: DateTime<Local>) -> Vec<BackupJob> {
    config
        .databases
        .iter()
        .map(|entry| resolve_job(entry, &config.global, timestamp))
        .collect()
}
