//! Check that the external tools a batch needs are installed

use crate::config::BackupJob;
use std::collections::BTreeSet;
use tracing::debug;

/// Programs the given jobs will spawn on this host
///
/// Jobs whose method does not parse are skipped; they fail on their own.
pub fn required_tools(jobs: &[BackupJob]) -> BTreeSet<&'static str> {
    let mut tools: BTreeSet<&'static str> = jobs
        .iter()
        .filter_map(|job| job.execution_method().ok())
        .map(|method| method.program())
        .collect();
    if !jobs.is_empty() {
        tools.insert("du");
    }
    tools
}

/// Tools from `required_tools` that are not on PATH
pub fn missing_tools(jobs: &[BackupJob]) -> Vec<&'static str> {
    required_tools(jobs)
        .into_iter()
        .filter(|tool| match which::which(tool) {
            Ok(path) => {
                debug!("Found {} at {:?}", tool, path);
                false
            }
            Err(_) => true,
        })
        .collect()
}
