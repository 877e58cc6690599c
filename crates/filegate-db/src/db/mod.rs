//! Database repositories for data access layer
//!
//! `RecordStore` is the registry contract the API depends on. `FileRepository`
//! implements it over PostgreSQL; `MemoryRecordStore` implements it in memory
//! for tests.

pub mod file;
pub mod membership;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod record_store;

pub use file::FileRepository;
pub use membership::TenantMemberRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryRecordStore;
pub use record_store::{FileRelations, NewJob, RecordStore};
