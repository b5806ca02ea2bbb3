//! Fluent API for building test configurations
//!
//! Provides a builder pattern for creating test configurations with sensible defaults.

use crate::fixtures::batch_timestamp;
use db_backup::config::{resolve_jobs, BackupJob, Config, DatabaseEntry, GlobalConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct ConfigBuilder {
    temp_dir: TempDir,
    global: GlobalConfig,
    databases: Vec<DatabaseEntry>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder whose backup and log directories live in a temp dir
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let log_directory = temp_dir.path().join("logs");
        fs::create_dir_all(&log_directory).expect("Failed to create log_directory");

        let global = GlobalConfig {
            backup_dir: temp_dir.path().join("backup"),
            log_directory,
            log_max_files: 5,
            ..Default::default()
        };

        Self {
            temp_dir,
            global,
            databases: Vec::new(),
        }
    }

    /// Set the default execution method
    pub fn with_method(mut self, method: &str) -> Self {
        self.global.method = method.to_string();
        self
    }

    /// Set the cluster namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.global.namespace = namespace.to_string();
        self
    }

    /// Set the remote scratch directory
    pub fn with_scratch_dir(mut self, scratch_dir: &str) -> Self {
        self.global.scratch_dir = scratch_dir.to_string();
        self
    }

    /// Add a database with container and pod targets named after it
    pub fn add_database(mut self, db_type: &str, database: &str) -> Self {
        self.databases.push(DatabaseEntry {
            db_type: db_type.to_string(),
            database: database.to_string(),
            container: Some(format!("{}-db", database)),
            pod: Some(format!("{}-db-0", database)),
            ..Default::default()
        });
        self
    }

    /// Add a database with full configuration
    pub fn add_entry(mut self, entry: DatabaseEntry) -> Self {
        self.databases.push(entry);
        self
    }

    /// Set a literal password on the most recently added database
    pub fn with_password(mut self, password: &str) -> Self {
        if let Some(entry) = self.databases.last_mut() {
            entry.password = Some(password.to_string());
        }
        self
    }

    /// Override the method of the most recently added database
    pub fn with_database_method(mut self, method: &str) -> Self {
        if let Some(entry) = self.databases.last_mut() {
            entry.method = Some(method.to_string());
        }
        self
    }

    /// Get the temp directory path
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root of the backup tree
    pub fn backup_dir(&self) -> &Path {
        &self.global.backup_dir
    }

    /// Resolve the current configuration at the fixture timestamp
    pub fn jobs(&self) -> Vec<BackupJob> {
        let config = Config {
            global: self.global.clone(),
            databases: self.databases.clone(),
        };
        resolve_jobs(&config, batch_timestamp())
    }

    /// Write the configuration as TOML into the temp dir and return its path
    pub fn write_config(&self) -> PathBuf {
        let config = Config {
            global: self.global.clone(),
            databases: self.databases.clone(),
        };
        let path = self.temp_dir.path().join("db-backup.toml");
        let contents = toml::to_string_pretty(&config).expect("Failed to serialize config");
        fs::write(&path, contents).expect("Failed to write config");
        path
    }

    /// Build the Config
    pub fn build(self) -> Config {
        Config {
            global: self.global,
            databases: self.databases,
        }
    }

    /// Keep the temp directory (don't delete on drop)
    pub fn persist(self) -> (Config, TempDir) {
        let config = Config {
            global: self.global,
            databases: self.databases,
        };
        (config, self.temp_dir)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
