use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use db_backup::config::{self, BackupJob, Config, GlobalConfig};
use db_backup::managers::logging::{self, LoggingConfig};
use db_backup::managers::{prompt, report};
use db_backup::strategies;
use db_backup::utils::locker::BatchLock;
use db_backup::utils::preflight;
use db_backup::BackupManager;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

#[derive(Parser)]
#[command(name = "db-backup")]
#[command(about = "Back up PostgreSQL, MySQL, MariaDB and MongoDB through docker or kubectl", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "db-backup.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up every configured database
    Run {
        /// Only back up these databases (by database name, repeatable)
        #[arg(long)]
        only: Vec<String>,

        /// Print outcomes as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the commands a run would execute, without running them
    Plan,

    /// Validate configuration file
    Validate,

    /// List all configured databases
    List,

    /// Configure a backup with prompts, then run it
    Interactive,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Interactive);

    match command {
        Commands::Run { only, json } => {
            let config = config::load_config(&cli.config)?;
            let _log_guard = logging::init_logging(&LoggingConfig::from_global(&config.global))?;
            run_batch(&config, &only, json)
        }

        Commands::Interactive => {
            let global = if cli.config.exists() {
                config::load_global(&cli.config)?
            } else {
                GlobalConfig::default()
            };
            let _log_guard = logging::init_logging(&LoggingConfig::from_global(&global))?;

            match prompt::prompt_config(global)? {
                Some(config) => run_batch(&config, &[], false),
                None => {
                    println!("Backup cancelled.");
                    Ok(ExitCode::SUCCESS)
                }
            }
        }

        Commands::Plan => {
            logging::init_console_logging();
            let config = config::load_config(&cli.config)?;
            let jobs = config::resolve_jobs(&config, Local::now());
            handle_plan(&jobs);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate => {
            logging::init_console_logging();
            handle_validate(&cli.config)
        }

        Commands::List => {
            logging::init_console_logging();
            let config = config::load_config(&cli.config)?;
            handle_list(&config);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_batch(config: &Config, only: &[String], json: bool) -> Result<ExitCode> {
    let mut jobs = config::resolve_jobs(config, Local::now());
    if !only.is_empty() {
        jobs.retain(|job| only.contains(&job.connection.database));
        anyhow::ensure!(
            !jobs.is_empty(),
            "No configured database matches: {}",
            only.join(", ")
        );
    }

    // Jobs needing a missing tool fail on their own; the rest still run
    let missing = preflight::missing_tools(&jobs);
    if !missing.is_empty() {
        warn!("Required tools not found in PATH: {}", missing.join(", "));
        eprintln!(
            "⚠ Required tools not found in PATH: {} (databases that need them will fail)",
            missing.join(", ")
        );
    }

    let backup_dir = config::expand_tilde(&config.global.backup_dir);
    let mut lock = BatchLock::open(&backup_dir)?;
    let _guard = lock.try_acquire()?;

    let manager = BackupManager::new();
    let outcomes = if json {
        let outcomes = manager.run(&jobs);
        report::write_json(std::io::stdout().lock(), &outcomes)?;
        outcomes
    } else {
        let mut reporter = report::ConsoleReporter::stdout();
        reporter.print_plan_summary(&jobs)?;
        let outcomes = manager.run_observed(&jobs, &mut reporter);
        reporter.print_summary(&outcomes)?;
        outcomes
    };

    if outcomes.iter().all(|o| o.success()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn handle_plan(jobs: &[BackupJob]) {
    for (i, job) in jobs.iter().enumerate() {
        println!(
            "{}. {} '{}' via {}",
            i + 1,
            job.engine,
            job.connection.database,
            job.method
        );
        match strategies::build_plan(job) {
            Ok(plan) => {
                for (phase, invocation) in plan.steps() {
                    println!("   {:<8} {}", phase, invocation.redacted());
                }
                println!("   -> {}", plan.destination().display());
            }
            Err(e) => println!("   ✗ {}", e),
        }
        println!();
    }
}

fn handle_validate(path: &Path) -> Result<ExitCode> {
    println!("Validating configuration: {:?}", path);

    let config = match config::load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Configuration is invalid: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let jobs = config::resolve_jobs(&config, Local::now());

    let mut warnings = 0;
    for job in &jobs {
        if let Err(e) = strategies::build_plan(job) {
            println!("⚠ {} '{}': {}", job.engine, job.connection.database, e);
            warnings += 1;
        }
    }

    println!(
        "✓ Configuration is valid ({} database(s), {} warning(s))",
        jobs.len(),
        warnings
    );
    Ok(ExitCode::SUCCESS)
}

fn handle_list(config: &Config) {
    println!("Configured databases:\n");
    for entry in &config.databases {
        let method = entry.method.as_deref().unwrap_or(&config.global.method);
        println!("  {:<10} {:<24} {}", entry.db_type, entry.database, method);
    }
}
