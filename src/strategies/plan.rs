//! Command plans and their execution
//!
//! A `CommandPlan` is what the builder produces for one job. Executing it is
//! the adapter half of the matrix: single commands either have their stdout
//! captured into the dump file or write into a mounted directory, and staged
//! exports run create, copy-out and cleanup in that order.

use crate::error::BackupError;
use crate::utils::executor::CommandExecutor;
use anyhow::Result;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tracing::{debug, info, warn};

/// One external command, with any secret material kept out of argv
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((name.into(), value.into()));
        self
    }

    pub fn stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }

    /// Command line safe to log: env values and stdin are masked
    pub fn redacted(&self) -> String {
        let mut parts: Vec<String> = self
            .envs
            .iter()
            .map(|(name, _)| format!("{}=***", name))
            .collect();
        parts.push(self.program.clone());
        parts.extend(self.args.iter().map(|a| shell_quote(a)));
        if self.stdin.is_some() {
            parts.push("<<< ***".to_string());
        }
        parts.join(" ")
    }

    /// Run through the given executor
    pub fn run(&self, executor: &dyn CommandExecutor) -> Result<Output> {
        debug!("Executing: {}", self.redacted());
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let envs: Vec<(&str, &str)> = self
            .envs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        executor.run_command(&self.program, &args, &envs, self.stdin.as_deref())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invocation({})", self.redacted())
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// The three phases of a directory export from a running target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedExport {
    /// Run the export into the remote scratch directory
    pub create: Invocation,
    /// Copy the produced directory to the host
    pub copy: Invocation,
    /// Remove the remote scratch directory (best effort)
    pub cleanup: Invocation,
    /// Target description used in failure details
    pub target: String,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPlan {
    /// Single command whose stdout is the dump file
    Capture {
        command: Invocation,
        context: String,
        destination: PathBuf,
    },
    /// Single command writing into a directory mounted from the host
    Mounted {
        command: Invocation,
        context: String,
        destination: PathBuf,
    },
    /// Remote create, copy out, remote cleanup
    Staged(StagedExport),
}

impl CommandPlan {
    pub fn destination(&self) -> &Path {
        match self {
            CommandPlan::Capture { destination, .. } | CommandPlan::Mounted { destination, .. } => {
                destination
            }
            CommandPlan::Staged(staged) => &staged.destination,
        }
    }

    /// Every invocation in execution order, labelled by phase
    pub fn steps(&self) -> Vec<(&'static str, &Invocation)> {
        match self {
            CommandPlan::Capture { command, .. } => vec![("dump", command)],
            CommandPlan::Mounted { command, .. } => vec![("export", command)],
            CommandPlan::Staged(staged) => vec![
                ("create", &staged.create),
                ("copy", &staged.copy),
                ("cleanup", &staged.cleanup),
            ],
        }
    }

    /// Execute the plan
    ///
    /// The exit status of each external command decides success. An empty
    /// artifact after a successful command is not second-guessed here.
    pub fn execute(&self, executor: &dyn CommandExecutor) -> std::result::Result<(), BackupError> {
        match self {
            CommandPlan::Capture {
                command,
                context,
                destination,
            } => {
                let output = command
                    .run(executor)
                    .map_err(|e| BackupError::remote(context.as_str(), e))?;
                fs::write(destination, &output.stdout).map_err(|source| {
                    BackupError::ArtifactWrite {
                        path: destination.clone(),
                        source,
                    }
                })?;
                debug!("Wrote {} bytes to {:?}", output.stdout.len(), destination);
                Ok(())
            }
            CommandPlan::Mounted { command, context, .. } => {
                command
                    .run(executor)
                    .map_err(|e| BackupError::remote(context.as_str(), e))?;
                Ok(())
            }
            CommandPlan::Staged(staged) => staged.execute(executor),
        }
    }
}

impl StagedExport {
    fn execute(&self, executor: &dyn CommandExecutor) -> std::result::Result<(), BackupError> {
        info!("Creating export inside {}", self.target);
        self.create
            .run(executor)
            .map_err(|e| BackupError::remote(format!("failed to create backup in {}", self.target), e))?;

        fs::create_dir_all(&self.destination).map_err(|source| BackupError::Directory {
            path: self.destination.clone(),
            source,
        })?;

        info!("Copying export from {} to {:?}", self.target, self.destination);
        self.copy
            .run(executor)
            .map_err(|e| BackupError::copy(format!("failed to copy backup from {}", self.target), e))?;

        cleanup_best_effort(&self.cleanup, executor, &self.target);
        Ok(())
    }
}

/// Run a cleanup command; its result is logged and never returned
fn cleanup_best_effort(cleanup: &Invocation, executor: &dyn CommandExecutor, target: &str) {
    match cleanup.run(executor) {
        Ok(_) => debug!("Removed scratch export inside {}", target),
        Err(e) => warn!("Failed to remove scratch export inside {}: {:#}", target, e),
    }
}
