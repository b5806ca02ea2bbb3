//! MongoDB integration tests
//!
//! Exercises the staged export: mongodump inside the container, docker cp
//! out, and removal of the scratch directory.

use super::common::{exec, is_docker_available, start_container, wait_until_ready};
use db_backup::BackupManager;
use test_utils::ConfigBuilder;

const CONTAINER: &str = "db-backup-test-mongodb";

#[test]
#[ignore] // Requires Docker
fn test_mongodb_docker_exec_staged_export() {
    if !is_docker_available() {
        println!("Docker not available, skipping test");
        return;
    }

    let _guard = start_container(CONTAINER, &["mongo:7"]).expect("Failed to start MongoDB");
    wait_until_ready(CONTAINER, &["mongosh", "--quiet", "--eval", "db.runCommand({ ping: 1 })"])
        .expect("MongoDB not ready");

    exec(
        CONTAINER,
        &["mongosh", "--quiet", "events", "--eval", "db.clicks.insertOne({ page: 'home' })"],
    )
    .expect("Failed to insert document");

    let entry = db_backup::config::DatabaseEntry {
        db_type: "mongodb".to_string(),
        database: "events".to_string(),
        container: Some(CONTAINER.to_string()),
        ..Default::default()
    };
    let builder = ConfigBuilder::new().add_entry(entry);

    let outcomes = BackupManager::new().run(&builder.jobs());

    let outcome = &outcomes[0];
    assert!(outcome.success(), "{:?}", outcome.failure());
    assert!(outcome
        .artifact_path()
        .join("events")
        .join("clicks.bson")
        .exists());

    // scratch directory is gone after a successful export
    let leftover = exec(CONTAINER, &["ls", "/tmp/db-backups"]).unwrap_or_default();
    assert!(leftover.is_empty(), "scratch not cleaned: {}", leftover);
}
