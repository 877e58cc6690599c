//! Filegate Database Library
//!
//! The file registry: tenant-scoped persistence of file records, their
//! processing jobs and derivatives, plus the tenant membership lookup.

pub mod db;

pub use db::{FileRelations, FileRepository, NewJob, RecordStore, TenantMemberRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use db::MemoryRecordStore;
