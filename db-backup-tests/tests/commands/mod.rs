//! Command tests for db-backup
//!
//! These tests drive the library the way each CLI command does, with a mocked
//! executor in place of docker and kubectl.

mod list;
mod run;
mod validate;
