//! Database layer for TaskHub
//!
//! # Modules
//!
//! - `pool`: PostgreSQL connection pool management with health checks
//! - `migrations`: embedded schema migrations
//!
//! Queries themselves live in the `repository` module.

pub mod migrations;
pub mod pool;
