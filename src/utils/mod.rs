pub mod command;
pub mod locker;
pub mod preflight;
pub mod size;
pub mod transport;

// Trait-based abstraction for testability
pub mod executor;

// Re-export commonly used types and traits (used by test crate)
pub use executor::{CommandExecutor, RealExecutor};
