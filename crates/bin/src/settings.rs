//! Database location and valuation config loading.

use crate::error::Result;
use fairval::data::SqliteStore;
use fairval::valuation::ValuationConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default data directory.
///
/// Uses platform-specific data directories:
/// - Linux: `~/.local/share/fairval/`
/// - macOS: `~/Library/Application Support/fairval/`
/// - Windows: `%APPDATA%\fairval\`
pub(crate) fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fairval")
}

/// Default database path.
pub(crate) fn default_db_path() -> PathBuf {
    default_data_dir().join("fairval.db")
}

/// Open the record database, creating its directory if needed.
pub(crate) fn open_store(path: Option<&Path>) -> Result<SqliteStore> {
    let path = path.map_or_else(default_db_path, Path::to_path_buf);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    debug!(path = %path.display(), "opening record store");
    Ok(SqliteStore::open(&path)?)
}

/// Load valuation assumptions from a JSON file, or the defaults.
///
/// Fields missing from the file keep their default values.
pub(crate) fn load_config(path: Option<&Path>) -> Result<ValuationConfig> {
    let config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            debug!(path = %path.display(), "loaded valuation config");
            serde_json::from_str::<ValuationConfig>(&content)?
        }
        None => ValuationConfig::default(),
    };

    config.validate()?;
    Ok(config)
}
