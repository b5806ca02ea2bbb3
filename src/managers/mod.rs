pub mod backup;
pub mod logging;
pub mod prompt;
pub mod report;
