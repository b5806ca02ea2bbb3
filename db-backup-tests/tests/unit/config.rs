//! Configuration loading and job resolution

use db_backup::config::{load_config, resolve_jobs, ConfigError};
use test_utils::{batch_timestamp, minimal_config_toml, mixed_config_toml, TestContext};

#[test]
fn test_minimal_config_defaults() {
    let ctx = TestContext::new();
    let config = load_config(ctx.write_config(minimal_config_toml())).unwrap();

    assert_eq!(config.global.method, "docker-exec");
    assert_eq!(config.global.namespace, "default");
    assert_eq!(config.global.scratch_dir, "/tmp/db-backups");

    let jobs = resolve_jobs(&config, batch_timestamp());
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].connection.host, "postgres");
    assert_eq!(jobs[0].connection.user, "postgres");
    assert_eq!(jobs[0].connection.version, "15");
    assert_eq!(jobs[0].backup_dir, ctx.backup_dir());
}

#[test]
fn test_mixed_config_resolution() {
    let ctx = TestContext::new();
    let config = load_config(ctx.write_config(mixed_config_toml())).unwrap();
    let jobs = resolve_jobs(&config, batch_timestamp());

    let methods: Vec<_> = jobs.iter().map(|j| j.method.as_str()).collect();
    assert_eq!(methods, vec!["kubectl-exec", "docker-exec", "docker-run", "docker-exec"]);

    assert_eq!(jobs[0].namespace, "production");
    assert_eq!(jobs[0].connection.pod, "postgres-primary-0");
    assert_eq!(jobs[0].connection.password, "pg-secret");
    assert!(jobs[2].connection.password.is_empty());

    // alias resolves to the canonical engine
    assert_eq!(
        jobs[3].database_type().unwrap(),
        db_backup::DatabaseType::Mongodb
    );
}

#[test]
fn test_invalid_toml() {
    let ctx = TestContext::new();
    let path = ctx.create_file("db-backup.toml", "invalid { toml content");

    assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_missing_file() {
    let ctx = TestContext::new();
    let result = load_config(ctx.temp_dir().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::ReadError(_))));
}

#[test]
fn test_unknown_log_level() {
    let ctx = TestContext::new();
    let path = ctx.create_file(
        "db-backup.toml",
        r#"
[global]
log_level = "loud"

[[databases]]
type = "postgres"
database = "app"
"#,
    );

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("Unknown log level"));
}
