//! AcadFlow Common Library
//!
//! Shared code for the AcadFlow services including:
//! - Workflow rules (FYP stage machine, clearance aggregation, permissions)
//! - Database models and repository pattern
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Metrics and observability

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod workflow;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use db::Repository;
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plagiarism reports above this similarity percentage are rejected at the boundary
pub const PLAGIARISM_SIMILARITY_THRESHOLD: f64 = 20.0;

/// Evaluation marks bounds
pub const EVALUATION_MIN_MARKS: i32 = 0;
pub const EVALUATION_MAX_MARKS: i32 = 100;
