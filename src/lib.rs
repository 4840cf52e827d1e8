// Core modules
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod indicators;
pub mod models;
pub mod strategy;

// Re-export commonly used types
pub use engine::{ControlLoop, CycleOutcome, CycleReport, LoopSettings};
pub use error::{ConfigError, CycleError, DataFetchError, ExecutionError, Result};
pub use models::*;
pub use strategy::Strategy;
