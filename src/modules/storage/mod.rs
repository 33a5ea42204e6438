//! Storage module for file management
//!
//! Provides a local disk store for uploaded product images.

mod disk_storage;

pub use disk_storage::DiskStorage;
