//! Filegate Core Library
//!
//! This crate provides the domain models, error types, configuration and intent
//! validation shared by every Filegate component.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
