use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::errors::DeskError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const API_URL_ENV: &str = "DONATION_DESK_API_URL";
pub const CONFIG_HOME_ENV: &str = "DONATION_DESK_HOME";

/// Keys accepted by [`Config::set_field`].
pub const CONFIG_KEYS: &[&str] = &[
    "api-url",
    "currency",
    "locale",
    "submission-timeout",
    "reference-timeout",
    "list-limit",
    "export-dir",
];

const APP_DIR: &str = "donation_desk";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub submission_timeout_secs: u64,
    pub reference_timeout_secs: u64,
    pub currency: String,
    pub locale: String,
    pub donation_list_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            submission_timeout_secs: 30,
            reference_timeout_secs: 5,
            currency: "EUR".into(),
            locale: "en-US".into(),
            donation_list_limit: 1000,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn submission_timeout(&self) -> Duration {
        Duration::from_secs(self.submission_timeout_secs)
    }

    pub fn reference_timeout(&self) -> Duration {
        Duration::from_secs(self.reference_timeout_secs)
    }

    /// Effective configuration: the persisted values plus environment overrides.
    /// Never saved back to disk.
    pub fn with_env_overrides(self) -> Self {
        let url = env::var(API_URL_ENV).ok();
        self.with_api_override(url.as_deref())
    }

    pub fn with_api_override(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) {
            self.api_base_url = url.to_string();
        }
        self
    }

    /// Updates one setting from its textual form.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        match key {
            "api-url" => {
                let parsed = url::Url::parse(value)
                    .map_err(|_| format!("`{}` is not a valid URL", value))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err("The API URL must use http or https".into());
                }
                self.api_base_url = value.to_string();
            }
            "currency" => {
                if value.len() != 3 || !value.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    return Err("Use a three-letter ISO currency code".into());
                }
                self.currency = value.to_ascii_uppercase();
            }
            "locale" => self.locale = value.to_string(),
            "submission-timeout" => self.submission_timeout_secs = parse_seconds(value)?,
            "reference-timeout" => self.reference_timeout_secs = parse_seconds(value)?,
            "list-limit" => {
                self.donation_list_limit = value
                    .parse::<u32>()
                    .ok()
                    .filter(|limit| *limit > 0)
                    .ok_or_else(|| "Enter a whole number greater than zero".to_string())?;
            }
            "export-dir" => {
                self.export_dir = match value {
                    "" | "none" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            other => {
                return Err(format!(
                    "Unknown setting `{}` (available: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("api-url", self.api_base_url.clone()),
            ("currency", self.currency.clone()),
            ("locale", self.locale.clone()),
            (
                "submission-timeout",
                format!("{}s", self.submission_timeout_secs),
            ),
            (
                "reference-timeout",
                format!("{}s", self.reference_timeout_secs),
            ),
            ("list-limit", self.donation_list_limit.to_string()),
            (
                "export-dir",
                self.export_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "(current directory)".into()),
            ),
        ]
    }
}

fn parse_seconds(value: &str) -> Result<u64, String> {
    value
        .trim_end_matches('s')
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| "Enter a number of seconds greater than zero".to_string())
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, DeskError> {
        Self::from_base(base_dir()?)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, DeskError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, DeskError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Persisted configuration, without environment overrides.
    pub fn load(&self) -> Result<Config, DeskError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), DeskError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn base_dir() -> Result<PathBuf, DeskError> {
    if let Some(home) = env::var_os(CONFIG_HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| DeskError::Config("unable to resolve a configuration directory".into()))
}

fn ensure_dir(path: &Path) -> Result<(), DeskError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), DeskError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.submission_timeout(), Duration::from_secs(30));
        assert_eq!(config.reference_timeout(), Duration::from_secs(5));
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn save_then_load_preserves_values() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            donation_list_limit: 25,
            currency: "GBP".into(),
            ..Config::default()
        };
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.donation_list_limit, 25);
        assert_eq!(loaded.currency, "GBP");
        assert!(!manager.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn set_field_validates_values() {
        let mut config = Config::default();
        config.set_field("currency", "gbp").unwrap();
        config.set_field("submission-timeout", "45s").unwrap();
        config.set_field("export-dir", "/tmp/exports").unwrap();
        assert_eq!(config.currency, "GBP");
        assert_eq!(config.submission_timeout(), Duration::from_secs(45));
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));

        assert!(config.set_field("api-url", "ftp://example.com").is_err());
        assert!(config.set_field("list-limit", "0").is_err());
        assert!(config.set_field("colour", "blue").is_err());
        config.set_field("export-dir", "none").unwrap();
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "submission_timeout_secs": 10 }"#).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.submission_timeout_secs, 10);
        assert_eq!(loaded.reference_timeout_secs, 5);
    }

    #[test]
    fn api_override_stays_out_of_the_saved_file() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();

        let stored = manager.load().unwrap();
        let effective = stored
            .clone()
            .with_api_override(Some(" http://staging.example:9000/api "));
        assert_eq!(effective.api_base_url, "http://staging.example:9000/api");

        let mut stored = stored;
        stored.set_field("currency", "usd").unwrap();
        manager.save(&stored).unwrap();

        let reloaded = manager.load().unwrap();
        assert_eq!(reloaded.api_base_url, DEFAULT_API_URL);
        assert_eq!(reloaded.currency, "USD");
        assert_eq!(
            reloaded.clone().with_api_override(Some("  ")).api_base_url,
            DEFAULT_API_URL
        );
    }
}
