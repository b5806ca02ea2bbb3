//! Interactive configuration prompts
//!
//! Builds the same `Config` a TOML file would, one question at a time.

use crate::config::{
    check_database_name, validate_config, Config, DatabaseEntry, DatabaseType, ExecutionMethod,
    GlobalConfig,
};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

/// Ask for method, databases and connection details
///
/// Returns `None` when the user declines the final confirmation.
pub fn prompt_config(base: GlobalConfig) -> Result<Option<Config>> {
    let method = select_method()?;
    let types = select_databases()?;

    let mut global = base;
    global.method = method.as_str().to_string();
    if method == ExecutionMethod::KubectlExec {
        global.namespace = ask("Kubernetes Namespace", &global.namespace)?;
    }

    let databases = types
        .into_iter()
        .map(|db_type| configure_database(db_type, method))
        .collect::<Result<Vec<_>>>()?;
    let config = prompted_config(global, databases)?;

    println!();
    let proceed = Confirm::new()
        .with_prompt("Proceed with backup?")
        .default(true)
        .interact()?;

    Ok(proceed.then_some(config))
}

/// Assemble the answers and hold them to the same rules as a config file
fn prompted_config(global: GlobalConfig, databases: Vec<DatabaseEntry>) -> Result<Config> {
    let config = Config { global, databases };
    validate_config(&config).context("Invalid answers")?;
    Ok(config)
}

fn select_method() -> Result<ExecutionMethod> {
    let items: Vec<String> = ExecutionMethod::ALL
        .iter()
        .map(|m| format!("{:<13} ({})", m.as_str(), m.description()))
        .collect();

    let selection = Select::new()
        .with_prompt("Select backup method")
        .items(&items)
        .default(1)
        .interact()?;

    Ok(ExecutionMethod::ALL[selection])
}

fn select_databases() -> Result<Vec<DatabaseType>> {
    let mut items: Vec<&str> = DatabaseType::ALL.iter().map(|t| t.label()).collect();
    items.push("All databases");

    let chosen = MultiSelect::new()
        .with_prompt("Select databases to backup (space to toggle)")
        .items(&items)
        .interact()?;

    selected_types(&chosen)
}

/// Map selected indices back to engines, keeping menu order
///
/// The entry after the engines selects every engine.
fn selected_types(indices: &[usize]) -> Result<Vec<DatabaseType>> {
    let all = indices.contains(&DatabaseType::ALL.len());
    let types: Vec<DatabaseType> = DatabaseType::ALL
        .iter()
        .enumerate()
        .filter(|(i, _)| all || indices.contains(i))
        .map(|(_, t)| *t)
        .collect();

    anyhow::ensure!(!types.is_empty(), "no databases selected");
    Ok(types)
}

fn configure_database(db_type: DatabaseType, method: ExecutionMethod) -> Result<DatabaseEntry> {
    let defaults = db_type.defaults();
    let label = db_type.label();
    println!("\n=== Configuring {} ===", db_type.as_str().to_uppercase());

    let mut entry = DatabaseEntry {
        db_type: db_type.as_str().to_string(),
        host: Some(ask(&format!("{} Host", label), defaults.host)?),
        ..Default::default()
    };

    // mongodump runs without credentials
    if db_type != DatabaseType::Mongodb {
        entry.user = Some(ask(&format!("{} User", label), defaults.user)?);
    }
    entry.database = ask_database_name()?;
    if db_type != DatabaseType::Mongodb {
        let password = Password::new()
            .with_prompt(format!("{} Password", label))
            .allow_empty_password(true)
            .interact()
            .context("Failed to read password")?;
        entry.password = Some(password);
    }
    entry.version = Some(ask(&format!("{} Version", label), defaults.version)?);

    match method {
        ExecutionMethod::DockerExec => {
            entry.container = Some(ask("Container Name", defaults.container)?);
        }
        ExecutionMethod::KubectlExec => {
            entry.pod = Some(ask("Pod Name", defaults.pod)?);
        }
        ExecutionMethod::DockerRun => {}
    }

    Ok(entry)
}

fn ask_database_name() -> Result<String> {
    let value: String = Input::new()
        .with_prompt("Database Name")
        .default("mydb".to_string())
        .validate_with(|input: &String| check_database_name(input))
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn ask(prompt: &str, default: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}
