//! Database Backup Library
//!
//! This library runs database backups by driving external tooling: vendor
//! dump utilities invoked through a container runtime or a cluster exec.

pub mod config;
pub mod error;
pub mod managers;
pub mod strategies;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, resolve_jobs, BackupJob, Config, DatabaseType, ExecutionMethod};
pub use error::{BackupError, ErrorKind};
pub use managers::backup::{BackupManager, BackupOutcome, BatchObserver};
pub use managers::logging::{init_console_logging, init_logging, LogGuard, LoggingConfig};
