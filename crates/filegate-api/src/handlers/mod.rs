//! File lifecycle handlers.

pub mod confirm;
pub mod download_url;
pub mod file_delete;
pub mod file_get;
pub mod file_list;
pub mod upload_url;
