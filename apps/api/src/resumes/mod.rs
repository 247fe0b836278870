//! Resume intake and storage: multipart upload plus the file-backed store.

pub mod handlers;
pub mod store;
