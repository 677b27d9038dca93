use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
    assets::{get_config_dir, get_default_config},
    offline::manifest::Manifest,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReplConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

fn default_prompt() -> String {
    "> ".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OfflineConfig {
    pub base_url: String,
    #[serde(default)]
    pub manifest: Manifest,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            manifest: Manifest::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub repl: ReplConfig,
    #[serde(default)]
    pub offline: OfflineConfig,
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(|| {
        let config_dir = get_config_dir();
        config_dir.join("replbox.yml")
    });

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::Config(format!(
            "Invalid config path: {}",
            actual_path.to_string_lossy()
        ))
    })?;
    fs::create_dir_all(parent_dir)?;

    if actual_path.exists() {
        return Ok((false, actual_path));
    }

    let mut file = File::create(&actual_path)?;
    file.write_all(get_default_config().as_bytes())?;
    Ok((true, actual_path))
}

pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, actual_path) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&actual_path)?;
    let config: Config = serde_yaml::from_str(&content)?;

    if config.offline.manifest.assets.is_empty() {
        return Err(ConfigError::Config(
            "Offline manifest must list at least one asset".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_from_str(content: &str) -> Result<Config, ConfigError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        get_config(Some(file.path().to_path_buf()))
    }

    #[test]
    fn test_config_parses_defaults() {
        let config = config_from_str(&get_default_config()).unwrap();
        assert_eq!(config.repl.prompt, "> ");
        assert_eq!(config.offline.manifest.version, "repl-v1");
        assert_eq!(config.offline.manifest.assets, vec![".", "app.css", "app.js"]);
    }

    #[test]
    fn test_config_custom_manifest() {
        let content = r#"
offline:
  base_url: "https://repl.example.net/"
  manifest:
    version: repl-v2
    assets:
      - index.html
      - main.js
"#;
        let config = config_from_str(content).unwrap();
        assert_eq!(config.offline.base_url, "https://repl.example.net/");
        assert_eq!(config.offline.manifest.version, "repl-v2");
        assert_eq!(config.offline.manifest.assets.len(), 2);
    }

    #[test]
    fn test_config_rejects_empty_manifest() {
        let content = r#"
offline:
  base_url: "https://repl.example.net/"
  manifest:
    version: repl-v2
    assets: []
"#;
        let err = config_from_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_config_created_when_missing() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let path = tmp_dir.path().join("replbox.yml");

        let (created, actual) = create_or_get_config_file(Some(path.clone())).unwrap();
        assert!(created);
        assert_eq!(actual, path);
        assert!(path.exists());

        // Second call must not overwrite
        let (created, _) = create_or_get_config_file(Some(path)).unwrap();
        assert!(!created);
    }

    #[test]
    fn test_config_invalid_yaml() {
        let err = config_from_str("repl: [not a map").unwrap_err();
        assert!(matches!(err, ConfigError::YAMLError(_)));
    }
}
