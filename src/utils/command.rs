//! Utilities for running commands with proper error handling

use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tracing::{debug, error};

/// Run a command to completion, feeding `stdin` if given
///
/// `envs` are added to the child's environment; only their names are logged.
/// A non-zero exit status is an error carrying the command's stderr.
pub fn run_command(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
    stdin: Option<&[u8]>,
) -> Result<Output> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.envs(envs.iter().copied());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() });

    debug!("Running command: {} {}", program, args.join(" "));
    if !envs.is_empty() {
        let names: Vec<&str> = envs.iter().map(|(name, _)| *name).collect();
        debug!("Injected environment: {}", names.join(", "));
    }

    let mut child = cmd
        .spawn()
        .context(format!("Failed to execute {}", program))?;

    // stdin is written on its own thread while output is drained
    let writer = match (stdin, child.stdin.take()) {
        (Some(data), Some(mut pipe)) => {
            let data = data.to_vec();
            Some(std::thread::spawn(move || pipe.write_all(&data)))
        }
        _ => None,
    };

    let output = child
        .wait_with_output()
        .context(format!("Failed to wait for {}", program))?;

    if let Some(handle) = writer {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Failed to write stdin to {}: {}", program, e),
            Err(_) => debug!("Stdin writer for {} panicked", program),
        }
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("Command failed: {} {}", program, args.join(" "));
        error!("Stderr: {}", stderr.trim());
        anyhow::bail!(
            "Command failed with exit code {:?}: {}",
            output.status.code(),
            stderr.trim()
        );
    }

    Ok(output)
}

/// Run a command and return stdout as string
pub fn run_command_stdout(program: &str, args: &[&str]) -> Result<String> {
    let output = run_command(program, args, &[], None)?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
