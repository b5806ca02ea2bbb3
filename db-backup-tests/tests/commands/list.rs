//! Tests for the 'list' command
//!
//! The list command displays every configured database and its method.

use db_backup::config::load_config;
use test_utils::{mixed_config_toml, TestContext};

#[test]
fn test_list_keeps_configuration_order() {
    let ctx = TestContext::new();
    let config = load_config(ctx.write_config(mixed_config_toml())).unwrap();

    let names: Vec<_> = config.databases.iter().map(|d| d.database.as_str()).collect();
    assert_eq!(names, vec!["production_db", "shop", "wiki", "events"]);
}

#[test]
fn test_list_shows_method_override() {
    let ctx = TestContext::new();
    let config = load_config(ctx.write_config(mixed_config_toml())).unwrap();

    let methods: Vec<_> = config
        .databases
        .iter()
        .map(|d| d.method.as_deref().unwrap_or(&config.global.method))
        .collect();
    assert_eq!(methods, vec!["kubectl-exec", "docker-exec", "docker-run", "docker-exec"]);
}
