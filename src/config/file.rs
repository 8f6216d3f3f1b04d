use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::display::Filter;
use crate::orientation::Orientation;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub password: Option<String>,
    pub key_device: Option<String>,
    pub touch_device: Option<String>,
    pub grab_input: Option<bool>,
    pub orientation: Option<Orientation>,
    pub release_debounce: Option<bool>,
    pub filter: Option<Filter>,
    pub wait_timeout_ms: Option<u64>,
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            if let Some(config) = load_from_path(&path) {
                return Some(config);
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("vnc-pad.toml"));

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join("vnc-pad.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config: FileConfig = toml::from_str(
            r#"
            password = "secret"
            key_device = "/dev/input/event3"
            touch_device = "/dev/input/event4"
            grab_input = false
            orientation = "inverted"
            release_debounce = false
            filter = "blur"
            wait_timeout_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.touch_device.as_deref(), Some("/dev/input/event4"));
        assert_eq!(config.grab_input, Some(false));
        assert_eq!(config.orientation, Some(Orientation::Inverted));
        assert_eq!(config.release_debounce, Some(false));
        assert_eq!(config.filter, Some(Filter::Blur));
        assert_eq!(config.wait_timeout_ms, Some(250));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.key_device.is_none());
        assert!(config.orientation.is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("pen_device = \"/dev/input/event1\"").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let path = std::env::temp_dir().join(format!("vnc-pad-test-{}.toml", std::process::id()));
        std::fs::write(&path, "filter = \"pixel\"\n").unwrap();
        let config = load_from_path(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.and_then(|c| c.filter), Some(Filter::Pixel));
    }
}
