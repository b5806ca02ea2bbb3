//! Configuration module for db-backup
//!
//! This module handles loading and validating the TOML configuration and
//! resolving it into an ordered list of backup jobs.
//!
//! ## Resolution
//!
//! Each `[[databases]]` entry becomes one `BackupJob`:
//! 1. Fields left out fall back to the engine defaults
//! 2. The method falls back to `global.method`
//! 3. The password is read from `password`, `password_env` or `password_file`;
//!    a source that cannot be read fails only that job
//!
//! ## Example Usage
//!
//! ```no_run
//! use db_backup::config;
//!
//! let config = config::load_config("db-backup.toml")?;
//! let jobs = config::resolve_jobs(&config, chrono::Local::now());
//!
//! for job in &jobs {
//!     println!("{} via {}", job.connection.database, job.method);
//! }
//! # Ok::<(), config::ConfigError>(())
//! ```

mod loader;
mod types;

pub use loader::{
    check_database_name, load_config, load_global, resolve_job, resolve_jobs, validate_config,
    ConfigError, Result,
};
pub use types::*;

/// Expand tilde (~) in path
pub fn expand_tilde(path: &std::path::Path) -> std::path::PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
