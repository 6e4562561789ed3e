//! Command implementations.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial module structure

pub mod customers;
pub mod import;
pub mod jobs;
pub mod matching;
pub mod setup;
