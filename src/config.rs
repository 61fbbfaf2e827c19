use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com";
const CONFIG_DIR_NAME: &str = "ithelp";
const CONFIG_FILE_NAME: &str = "config.toml";

const ENV_API_KEY: &str = "NOTION_API_KEY";
const ENV_DATABASE_ID: &str = "DATABASE_ID";
const ENV_API_BASE: &str = "NOTION_API_BASE";

/// Settings resolved once at startup and handed to the Notion client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub notion_api_key: String,
    pub database_id: String,
    pub notion_api_base: String,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(|key| env::var(key).ok(), stored)
    }

    /// Environment values win over the stored file. Blank values count as
    /// unset.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        stored: StoredConfig,
    ) -> AppResult<Self> {
        let pick = |key: &str, fallback: Option<String>| {
            lookup(key)
                .or(fallback)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let notion_api_key = pick(ENV_API_KEY, stored.notion_api_key).ok_or_else(|| {
            AppError::Configuration(format!(
                "Notion API key not configured; set {ENV_API_KEY} or run `ithelp config init`"
            ))
        })?;
        let database_id = pick(ENV_DATABASE_ID, stored.database_id).ok_or_else(|| {
            AppError::Configuration(format!(
                "Notion database id not configured; set {ENV_DATABASE_ID} or run `ithelp config init`"
            ))
        })?;
        let notion_api_base = pick(ENV_API_BASE, stored.notion_api_base)
            .unwrap_or_else(|| DEFAULT_NOTION_API_BASE.to_string());

        Ok(Self {
            notion_api_key,
            database_id,
            notion_api_base,
        })
    }
}

/// Contents of the on-disk config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notion_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notion_api_base: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            notion_api_key: Some("file-key".to_string()),
            database_id: Some("file-db".to_string()),
            notion_api_base: None,
        };

        let config = AppConfig::resolve(env_of(&[(ENV_API_KEY, "env-key")]), stored)
            .expect("config resolves");

        assert_eq!(config.notion_api_key, "env-key");
        assert_eq!(config.database_id, "file-db");
        assert_eq!(config.notion_api_base, DEFAULT_NOTION_API_BASE);
    }

    #[test]
    fn missing_secrets_are_fatal() {
        let err = AppConfig::resolve(env_of(&[(ENV_DATABASE_ID, "db")]), StoredConfig::default())
            .expect_err("api key is missing");
        assert!(matches!(err, AppError::Configuration(msg) if msg.contains(ENV_API_KEY)));

        let err = AppConfig::resolve(
            env_of(&[(ENV_API_KEY, "key"), (ENV_DATABASE_ID, "  ")]),
            StoredConfig::default(),
        )
        .expect_err("blank database id counts as missing");
        assert!(matches!(err, AppError::Configuration(msg) if msg.contains(ENV_DATABASE_ID)));
    }

    #[test]
    fn stored_config_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let stored = StoredConfig {
            notion_api_key: Some("secret_abc".to_string()),
            database_id: Some("db-123".to_string()),
            notion_api_base: Some("http://localhost:8080".to_string()),
        };

        stored.save_to(&path).expect("config saves");
        let loaded = StoredConfig::load_from(&path).expect("config loads");

        assert_eq!(loaded, stored);
    }

    #[test]
    fn absent_config_file_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded =
            StoredConfig::load_from(&dir.path().join(CONFIG_FILE_NAME)).expect("config loads");
        assert_eq!(loaded, StoredConfig::default());
    }

    #[test]
    fn malformed_config_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "database_id = [").expect("write config");

        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
