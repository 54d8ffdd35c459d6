//! # TaskHub Shared Library
//!
//! Core of the TaskHub record service: users, the tasks they own, and the
//! repository/service pair that keeps the two consistent.
//!
//! ## Module Organization
//!
//! - `models`: entity definitions and partial-update types
//! - `error`: repository and service error taxonomy
//! - `db`: connection pool and migrations
//! - `repository`: data access (PostgreSQL and in-memory)
//! - `service`: business rules exposed to the API layer

pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the TaskHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
