//! Data directory layout.

use std::path::{Path, PathBuf};

use cinechat_types::config::GlobalConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CINECHAT_DATA_DIR` environment variable
/// 2. `~/.cinechat`
/// 3. `./.cinechat`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CINECHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".cinechat");
    }

    PathBuf::from(".cinechat")
}

/// Catalog file: `search.catalog_path` if set, else `{data_dir}/catalog.json`.
pub fn catalog_path(data_dir: &Path, config: &GlobalConfig) -> PathBuf {
    config
        .search
        .catalog_path
        .clone()
        .unwrap_or_else(|| data_dir.join("catalog.json"))
}

/// Installed on-device model location. Absolute `model_file` values are kept.
pub fn model_path(data_dir: &Path, config: &GlobalConfig) -> PathBuf {
    data_dir.join(&config.backend.model_file)
}
