//! Test fixtures and sample data
//!
//! Provides pre-built configuration templates and canned tool output.

use chrono::{DateTime, Local, TimeZone};

/// Timestamp shared by fixture batches
pub fn batch_timestamp() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
        .single()
        .expect("fixture timestamp is unambiguous")
}

/// `batch_timestamp` as it appears in artifact names
pub const BATCH_STAMP: &str = "2024-03-09_14-05-07";

/// Minimal valid config TOML template
pub fn minimal_config_toml() -> &'static str {
    r#"
[global]
backup_dir = "{backup_dir}"
log_directory = "{log_dir}"

[[databases]]
type = "postgres"
database = "app"
container = "app-db"
"#
}

/// One database of every engine, reached through different methods
pub fn mixed_config_toml() -> &'static str {
    r#"
[global]
backup_dir = "{backup_dir}"
log_directory = "{log_dir}"
method = "docker-exec"
namespace = "production"

[[databases]]
type = "postgres"
database = "production_db"
password = "pg-secret"
method = "kubectl-exec"
pod = "postgres-primary-0"

[[databases]]
type = "mysql"
database = "shop"
password = "my-secret"
container = "test-mysql"

[[databases]]
type = "mariadb"
database = "wiki"
method = "docker-run"

[[databases]]
type = "mongo"
database = "events"
container = "test-mongodb"
"#
}

/// A batch containing an engine the tool does not support
pub fn unsupported_engine_config_toml() -> &'static str {
    r#"
[global]
backup_dir = "{backup_dir}"
log_directory = "{log_dir}"

[[databases]]
type = "postgres"
database = "first"
container = "pg"

[[databases]]
type = "oracle"
database = "legacy"
container = "ora"

[[databases]]
type = "mysql"
database = "last"
container = "my"
"#
}

/// Fill the `{backup_dir}` and `{log_dir}` placeholders of a template
pub fn render(template: &str, root: &std::path::Path) -> String {
    template
        .replace("{backup_dir}", &root.join("backup").display().to_string())
        .replace("{log_dir}", &root.join("logs").display().to_string())
}

/// Canned `du` output for a given size
pub fn du_output(size: &str) -> String {
    format!("{}\t/some/path\n", size)
}

/// First lines of a plain-format pg_dump
pub fn sample_pg_dump() -> &'static str {
    "--\n-- PostgreSQL database dump\n--\n\nCREATE TABLE public.items (id integer);\n"
}
