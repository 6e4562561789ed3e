//! SQLite store for jobs, customers and imported submissions.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial module structure

pub mod connection;
pub mod helpers;
pub mod queries;
