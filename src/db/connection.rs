//! SQLite connection management.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::error::StoreError;

/// Open (creating if needed) the store at `path`.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, StoreError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| StoreError::Open {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_db_path;

    #[test]
    fn test_default_db_path_is_sqlite_file() {
        let path = default_db_path();
        assert!(path.to_string_lossy().ends_with(".db"));
    }
}
