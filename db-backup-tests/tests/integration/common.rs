//! Common utilities for integration tests
//!
//! This module provides cleanup guards and helper functions for integration tests.

use anyhow::Result;
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Guard that ensures Docker container cleanup on drop (even on panic)
pub struct ContainerGuard {
    name: String,
}

impl ContainerGuard {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        cleanup_container(&self.name);
    }
}

/// Helper to stop and remove a Docker container
/// The -v flag also removes anonymous volumes associated with the container
fn cleanup_container(name: &str) {
    let _ = Command::new("docker").args(["stop", name]).output();
    let _ = Command::new("docker").args(["rm", "-v", name]).output();
}

/// Helper to check if Docker is available
pub fn is_docker_available() -> bool {
    Command::new("docker")
        .args(["ps"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Start a detached container, removing any leftover with the same name
pub fn start_container(name: &str, args: &[&str]) -> Result<ContainerGuard> {
    cleanup_container(name);

    let output = Command::new("docker")
        .args(["run", "-d", "--name", name])
        .args(args)
        .output()?;
    anyhow::ensure!(
        output.status.success(),
        "docker run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(ContainerGuard::new(name))
}

/// Poll a command inside the container until it succeeds
pub fn wait_until_ready(name: &str, probe: &[&str]) -> Result<()> {
    for _ in 0..60 {
        let ready = Command::new("docker")
            .arg("exec")
            .arg(name)
            .args(probe)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);

        if ready {
            return Ok(());
        }
        thread::sleep(Duration::from_secs(1));
    }

    Err(anyhow::anyhow!("{} failed to become ready", name))
}

/// Run a command inside the container and return its stdout
pub fn exec(name: &str, command: &[&str]) -> Result<String> {
    let output = Command::new("docker").arg("exec").arg(name).args(command).output()?;
    anyhow::ensure!(
        output.status.success(),
        "docker exec failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
