//! Tests for the 'run' command
//!
//! Full batches against a mocked executor.

use db_backup::managers::report::{write_json, ConsoleReporter};
use db_backup::ErrorKind;
use std::fs;
use std::sync::Arc;
use test_utils::{
    du_output, mixed_config_toml, sample_pg_dump, unsupported_engine_config_toml, BackupManager,
    MockExecutor, MockResponse, TestContext, BATCH_STAMP,
};

fn jobs(ctx: &TestContext, template: &str) -> Vec<db_backup::BackupJob> {
    let config = db_backup::config::load_config(ctx.write_config(template)).unwrap();
    db_backup::config::resolve_jobs(&config, test_utils::batch_timestamp())
}

#[test]
fn test_run_mixed_batch() {
    let ctx = TestContext::new();
    let executor = MockExecutor::new()
        .expect("kubectl", MockResponse::stdout(sample_pg_dump()))
        .expect("du", MockResponse::stdout(&du_output("12K")));

    let outcomes = BackupManager::with_executor(Arc::new(executor.clone())).run(&jobs(&ctx, mixed_config_toml()));

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| o.success()));

    let pg = ctx
        .backup_dir()
        .join("postgres")
        .join(format!("production_db_{}.sql", BATCH_STAMP));
    assert_eq!(fs::read_to_string(pg).unwrap(), sample_pg_dump());
    assert!(ctx.backup_dir().join("mongodb").join(BATCH_STAMP).is_dir());

    // password reached mysqldump through the docker client's environment
    let mysql = &executor.calls_with_arg("docker", "mysqldump")[0];
    assert_eq!(mysql.env_keys, vec!["MYSQL_PWD"]);
    assert!(mysql.has_arg("MYSQL_PWD"));
}

#[test]
fn test_run_unsupported_engine_fails_alone() {
    let ctx = TestContext::new();
    let executor = MockExecutor::new().expect("du", MockResponse::stdout(&du_output("1K")));

    let outcomes = BackupManager::with_executor(Arc::new(executor)).run(&jobs(&ctx, unsupported_engine_config_toml()));

    let results: Vec<_> = outcomes.iter().map(|o| (o.database(), o.success())).collect();
    assert_eq!(results, vec![("first", true), ("legacy", false), ("last", true)]);
    assert_eq!(outcomes[1].failure().unwrap().kind, ErrorKind::Configuration);
}

#[test]
fn test_run_console_report() {
    let ctx = TestContext::new();
    let executor = MockExecutor::new().expect("du", MockResponse::stdout(&du_output("1K")));
    let jobs = jobs(&ctx, unsupported_engine_config_toml());

    let mut reporter = ConsoleReporter::new(Vec::new());
    reporter.print_plan_summary(&jobs).unwrap();
    let outcomes = BackupManager::with_executor(Arc::new(executor)).run_observed(&jobs, &mut reporter);
    reporter.print_summary(&outcomes).unwrap();
    let text = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(text.contains("2. oracle - legacy via docker-exec"));
    assert!(text.contains("[ORACLE] Starting backup of 'legacy'"));
    assert!(text.contains("✗ Backup failed: unknown database type: oracle"));
    assert!(text.contains("Successful: 2"));
    assert!(text.contains("Failed: 1"));
}

#[test]
fn test_run_json_report() {
    let ctx = TestContext::new();
    let executor = MockExecutor::new().expect("du", MockResponse::stdout(&du_output("1K")));
    let outcomes = BackupManager::with_executor(Arc::new(executor)).run(&jobs(&ctx, unsupported_engine_config_toml()));

    let mut buf = Vec::new();
    write_json(&mut buf, &outcomes).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.contains("\"database\": \"legacy\""));
    assert!(text.contains("\"kind\": \"configuration\""));
    assert!(text.contains("\"size\": \"1K\""));
}

#[test]
fn test_run_unset_password_env_fails_only_that_database() {
    let ctx = TestContext::new();
    std::env::remove_var("DB_BACKUP_SHOP_PASSWORD_UNSET");
    let template = r#"
[global]
backup_dir = "{backup_dir}"
log_directory = "{log_dir}"

[[databases]]
type = "postgres"
database = "app"
container = "app-db"

[[databases]]
type = "mysql"
database = "shop"
container = "shop-db"
password_env = "DB_BACKUP_SHOP_PASSWORD_UNSET"
"#;
    let executor = MockExecutor::new()
        .expect("docker", MockResponse::stdout(sample_pg_dump()))
        .expect("du", MockResponse::stdout(&du_output("8.0K")));

    let outcomes = BackupManager::with_executor(Arc::new(executor.clone())).run(&jobs(&ctx, template));

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].success());
    assert!(outcomes[0].artifact_path().exists());

    let failure = outcomes[1].failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::Configuration);
    assert!(failure.message.contains("DB_BACKUP_SHOP_PASSWORD_UNSET"));
    assert_eq!(executor.call_count("docker"), 1);
}
