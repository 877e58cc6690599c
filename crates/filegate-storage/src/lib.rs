//! Filegate Storage Library
//!
//! This crate provides the URL signer and object deletion used by the file API.
//! It defines the `ObjectSigner` and `Storage` traits and an S3-compatible backend
//! (AWS S3, Cloudflare R2, MinIO) built on `object_store`.
//!
//! # Storage key format
//!
//! Keys are tenant-scoped: `uploads/{tenant_id}/{file_id}.{ext}`, with the
//! `.{ext}` suffix omitted when the filename has no usable extension. Key
//! generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectSigner, Storage, StorageError, StorageResult};
