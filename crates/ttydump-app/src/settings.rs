use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

/// Per-user defaults, overridden by anything given on the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub device: Option<PathBuf>,
    pub baud_rate: Option<u32>,
    pub column_width: Option<u32>,
}

impl Settings {
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ttydump").join("settings.json"))
    }

    /// Load from the user config directory. Problems fall back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("ignoring settings: {e:#}");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_the_rest_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "device": "/dev/ttyUSB1", "baud_rate": 31250 }"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.device, Some(PathBuf::from("/dev/ttyUSB1")));
        assert_eq!(settings.baud_rate, Some(31250));
        assert_eq!(settings.column_width, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"), "got {err:#}");
    }
}
