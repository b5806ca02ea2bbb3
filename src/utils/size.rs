//! Artifact size inspection via `du`

use super::executor::CommandExecutor;
use crate::error::BackupError;
use std::path::Path;

/// Reported when `du` succeeds but prints nothing usable
pub const UNKNOWN_SIZE: &str = "unknown";

/// Human readable size of a backup artifact
///
/// Directories are summed recursively (`du -sh`), files report their own
/// usage (`du -h`). A failing `du` is a measurement error.
pub fn measure(
    executor: &dyn CommandExecutor,
    path: &Path,
    is_directory: bool,
) -> Result<String, BackupError> {
    let path = path.to_string_lossy();
    let flags = if is_directory { "-sh" } else { "-h" };

    let stdout = executor
        .run_command_stdout("du", &[flags, &*path])
        .map_err(|e| BackupError::Measurement(format!("{:#}", e)))?;

    Ok(stdout
        .split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_SIZE.to_string()))
}
