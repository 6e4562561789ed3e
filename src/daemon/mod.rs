//! Match service daemon: a resident process holding a hot store connection.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial module structure

pub mod client;
pub mod protocol;
pub mod server;
pub mod service;
