//! Validation modules

pub mod upload;

pub use upload::{validate_upload_intent, UploadIntent};
