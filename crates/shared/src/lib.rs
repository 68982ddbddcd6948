//! Shared types, errors, and configuration for ZynBudget.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - Approval notification email

pub mod config;
pub mod email;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use email::{EmailError, EmailService, ForecastSubmissionNotice};
pub use error::{AppError, AppResult};
