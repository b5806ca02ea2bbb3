//! Tests for the 'validate' command
//!
//! The validate command checks configuration structure and reports matrix
//! problems per database without running anything.

use db_backup::config::load_config;
use db_backup::strategies::build_plan;
use db_backup::ErrorKind;
use test_utils::{ConfigBuilder, ResultAssertions, TestContext};

#[test]
fn test_validate_valid_config() {
    let builder = ConfigBuilder::new()
        .add_database("postgres", "app")
        .add_database("mongodb", "events");
    let path = builder.write_config();

    let loaded = load_config(&path).assert_ok();
    assert_eq!(loaded.databases.len(), 2);
}

#[test]
fn test_validate_empty_database_list() {
    let ctx = TestContext::new();
    let path = ctx.create_file("db-backup.toml", "[global]\nbackup_dir = \"backup\"\n");

    load_config(&path).assert_err_contains("No databases defined");
}

#[test]
fn test_validate_empty_database_name() {
    let ctx = TestContext::new();
    let path = ctx.create_file(
        "db-backup.toml",
        r#"
[[databases]]
type = "mysql"
database = ""
"#,
    );

    load_config(&path).assert_err_contains("database name is empty");
}

#[test]
fn test_validate_reports_matrix_problems_per_database() {
    let builder = ConfigBuilder::new()
        .add_database("postgres", "ok")
        .add_database("oracle", "legacy")
        .add_database("mysql", "shop")
        .with_database_method("telnet");

    let problems: Vec<_> = builder
        .jobs()
        .iter()
        .filter_map(|job| build_plan(job).err())
        .collect();

    assert_eq!(problems.len(), 2);
    assert!(problems.iter().all(|e| e.kind() == ErrorKind::Configuration));
    assert_eq!(problems[0].to_string(), "unknown database type: oracle");
    assert_eq!(problems[1].to_string(), "unknown backup method: telnet");
}

#[test]
fn test_validate_missing_pod() {
    let mut entry = db_backup::config::DatabaseEntry {
        db_type: "postgres".to_string(),
        database: "app".to_string(),
        ..Default::default()
    };
    entry.method = Some("kubectl-exec".to_string());
    let builder = ConfigBuilder::new().add_entry(entry);

    let err = build_plan(&builder.jobs()[0]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "kubectl-exec requires a pod name for database 'app'"
    );
}
