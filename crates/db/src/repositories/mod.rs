//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod log_entry_repo;

pub use log_entry_repo::LogEntryRepo;
