//! Test utilities for db-backup
//!
//! This crate provides shared test utilities, fixtures and helper functions
//! for testing the db-backup application.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_utils::{ConfigBuilder, MockExecutor, TestContext};
//!
//! #[test]
//! fn my_test() {
//!     let builder = ConfigBuilder::new().add_database("postgres", "app");
//!     let jobs = builder.jobs();
//!     // ... run jobs against a MockExecutor
//! }
//! ```

pub mod config_builder;
pub mod fixtures;
pub mod test_context;

// Re-export commonly used items
pub use config_builder::ConfigBuilder;
pub use fixtures::*;
pub use test_context::{ResultAssertions, TestContext};

// Re-export types from the main crate for convenience
pub use db_backup::config::{BackupJob, Config, DatabaseEntry, GlobalConfig};
pub use db_backup::managers::backup::{BackupManager, BackupOutcome};

// Re-export mock implementations from the main crate
pub use db_backup::utils::executor::mock::{CommandCall, MockExecutor, MockResponse};
pub use db_backup::utils::executor::CommandExecutor;
