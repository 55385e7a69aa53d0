//! Shared types, errors, and configuration for Homebook.
//!
//! This crate provides common types used across all other crates:
//! - Minor-unit conversions for exact money storage
//! - Pagination types for list queries
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
