//! Batch-level guarantees: one outcome per job, in order, never short-circuited

use db_backup::ErrorKind;
use rstest::rstest;
use std::sync::Arc;
use test_utils::{BackupManager, ConfigBuilder, MockExecutor, MockResponse};

#[rstest]
#[case(&["postgres", "oracle", "mysql"])]
#[case(&["oracle", "oracle"])]
#[case(&["mongodb", "mariadb", "sqlite", "postgres"])]
fn test_order_and_count_preserved(#[case] engines: &[&str]) {
    let mut builder = ConfigBuilder::new();
    for (i, engine) in engines.iter().enumerate() {
        builder = builder.add_database(engine, &format!("db{}", i));
    }
    let executor = MockExecutor::new();

    let outcomes = BackupManager::with_executor(Arc::new(executor)).run(&builder.jobs());

    assert_eq!(outcomes.len(), engines.len());
    for (i, (outcome, engine)) in outcomes.iter().zip(engines).enumerate() {
        assert_eq!(outcome.database(), format!("db{}", i));
        assert_eq!(outcome.database_type(), *engine);
        let supported = engine.parse::<db_backup::DatabaseType>().is_ok();
        assert_eq!(outcome.success(), supported);
    }
}

#[test]
fn test_failing_dump_does_not_stop_batch() {
    let builder = ConfigBuilder::new()
        .add_database("postgres", "broken")
        .add_database("mysql", "fine");
    let executor = MockExecutor::new()
        .expect_with_arg("docker", "pg_dump", MockResponse::failure("FATAL: role does not exist"));

    let outcomes = BackupManager::with_executor(Arc::new(executor.clone())).run(&builder.jobs());

    let failure = outcomes[0].failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::RemoteExecution);
    assert!(failure.message.starts_with("docker exec failed"));
    assert!(failure.message.contains("role does not exist"));
    assert!(!outcomes[0].artifact_path().exists());

    assert!(outcomes[1].success());
    assert_eq!(executor.calls_with_arg("docker", "mysqldump").len(), 1);
}

#[test]
fn test_durations_are_recorded_for_failures() {
    let builder = ConfigBuilder::new().add_database("postgres", "app").with_database_method("ssh");

    let outcomes = BackupManager::with_executor(Arc::new(MockExecutor::new())).run(&builder.jobs());

    assert!(!outcomes[0].success());
    assert!(outcomes[0].duration() >= std::time::Duration::ZERO);
}
