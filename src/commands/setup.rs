//! Setup command: create the store schema.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;
use std::path::Path;

use crate::db::helpers;
use crate::output::OutputControls;

/// Create tables in the store at `db_path`.
pub fn init(conn: &Connection, db_path: &Path, output: &OutputControls) -> Result<()> {
    helpers::init_schema(conn)
        .with_context(|| format!("Failed to initialise schema in {:?}", db_path))?;

    if output.json {
        output.print(&json!({
            "success": true,
            "db_path": db_path.display().to_string(),
        }));
    } else {
        println!("Initialised store at {}", db_path.display());
    }
    Ok(())
}
