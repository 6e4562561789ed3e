//! Domain adapters over the match engine.
//!
//! - `jobs`: imported submissions -> existing jobs (caller supplies jobs)
//! - `customers`: new jobs -> customer records (fetched from the store)
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial module structure

pub mod customers;
pub mod jobs;
