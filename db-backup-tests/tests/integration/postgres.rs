//! PostgreSQL integration tests
//!
//! These tests require Docker and verify real pg_dump runs through docker exec.

use super::common::{exec, is_docker_available, start_container, wait_until_ready};
use db_backup::BackupManager;
use std::fs;
use test_utils::ConfigBuilder;

const CONTAINER: &str = "db-backup-test-postgres";

#[test]
#[ignore] // Requires Docker
fn test_postgres_docker_exec_backup() {
    if !is_docker_available() {
        println!("Docker not available, skipping test");
        return;
    }

    let _guard = start_container(
        CONTAINER,
        &["-e", "POSTGRES_PASSWORD=testpass", "-e", "POSTGRES_DB=testdb", "postgres:15-alpine"],
    )
    .expect("Failed to start PostgreSQL");
    wait_until_ready(CONTAINER, &["pg_isready", "-U", "postgres"]).expect("PostgreSQL not ready");

    exec(
        CONTAINER,
        &["psql", "-U", "postgres", "-d", "testdb", "-c", "CREATE TABLE items (id SERIAL PRIMARY KEY, name TEXT)"],
    )
    .expect("Failed to create table");

    let entry = db_backup::config::DatabaseEntry {
        db_type: "postgres".to_string(),
        database: "testdb".to_string(),
        user: Some("postgres".to_string()),
        password: Some("testpass".to_string()),
        container: Some(CONTAINER.to_string()),
        ..Default::default()
    };
    let builder = ConfigBuilder::new().add_entry(entry);

    let outcomes = BackupManager::new().run(&builder.jobs());

    let outcome = &outcomes[0];
    assert!(outcome.success(), "{:?}", outcome.failure());
    assert_ne!(outcome.size(), Some("unknown"));

    let dump = fs::read_to_string(outcome.artifact_path()).expect("Failed to read dump");
    assert!(dump.contains("CREATE TABLE public.items"));
}

#[test]
#[ignore] // Requires Docker
fn test_postgres_missing_database_fails() {
    if !is_docker_available() {
        println!("Docker not available, skipping test");
        return;
    }

    let name = "db-backup-test-postgres-missing";
    let _guard = start_container(name, &["-e", "POSTGRES_PASSWORD=testpass", "postgres:15-alpine"])
        .expect("Failed to start PostgreSQL");
    wait_until_ready(name, &["pg_isready", "-U", "postgres"]).expect("PostgreSQL not ready");

    let entry = db_backup::config::DatabaseEntry {
        db_type: "postgres".to_string(),
        database: "does_not_exist".to_string(),
        container: Some(name.to_string()),
        ..Default::default()
    };
    let builder = ConfigBuilder::new().add_entry(entry);

    let outcomes = BackupManager::new().run(&builder.jobs());

    let failure = outcomes[0].failure().expect("backup of a missing database should fail");
    assert!(failure.message.contains("docker exec failed"));
    assert!(failure.message.contains("does_not_exist"));
}
