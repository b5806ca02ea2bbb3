//! Unit tests for db-backup
//!
//! Pure logic only: no processes are spawned.

mod config;
mod matrix;
mod outcome;
