//! Storage key derivation.
//!
//! Key format: `uploads/{tenant_id}/{file_id}.{ext}`. The extension is the text
//! after the last `.` of the client filename; it is dropped when empty or when it
//! contains anything other than ASCII alphanumerics, so client input can never
//! introduce path separators into a key.

use uuid::Uuid;

const KEY_PREFIX: &str = "uploads";

/// Extension of `filename`, if it has a usable one.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// Generate the storage key for a file owned by `tenant_id`.
pub fn generate_storage_key(tenant_id: Uuid, file_id: Uuid, filename: &str) -> String {
    match file_extension(filename) {
        Some(ext) => format!("{}/{}/{}.{}", KEY_PREFIX, tenant_id, file_id, ext),
        None => format!("{}/{}/{}", KEY_PREFIX, tenant_id, file_id),
    }
}
