//! Integration tests for db-backup
//!
//! These tests require Docker and run real dumps against throwaway containers.
//! Run with: `cargo test -p db-backup-tests --test integration -- --ignored`

mod common;
mod mongodb;
mod postgres;
