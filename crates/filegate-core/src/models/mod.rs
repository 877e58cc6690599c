//! Data models for the application
//!
//! Each sub-module covers one record kind tracked by the file registry.

mod derivative;
mod file;
mod membership;
mod processing_job;

pub use derivative::*;
pub use file::*;
pub use membership::*;
pub use processing_job::*;
