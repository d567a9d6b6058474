use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WorldError};

/// Startup settings, read from a TOML file.
///
/// ```toml
/// area_dir = "data/areas"
/// areas = ["midgaard.json", "forest.toml"]
/// log_filter = "mud_world=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_area_dir")]
    pub area_dir: PathBuf,

    /// Area files under `area_dir`, loaded in this order.
    #[serde(default)]
    pub areas: Vec<String>,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_area_dir() -> PathBuf {
    PathBuf::from("data/areas")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            area_dir: default_area_dir(),
            areas: Vec::new(),
            log_filter: default_log_filter(),
        }
    }
}

impl WorldConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| WorldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let cfg = WorldConfig::from_toml("areas = [\"town.json\"]").unwrap();
        assert_eq!(cfg.area_dir, PathBuf::from("data/areas"));
        assert_eq!(cfg.areas, vec!["town.json".to_string()]);
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(WorldConfig::from_toml("").unwrap(), WorldConfig::default());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(matches!(
            WorldConfig::from_toml("areas = ["),
            Err(WorldError::Parse(_))
        ));
    }
}
