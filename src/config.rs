//! Configuration loading.
//!
//! Values come from an optional TOML file, then environment overrides. Every
//! field has a default so a bare `jotinha show` works against a local board.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::domain::entities::layout::{SheetLayout, CARDS_TAB, COLUMNS_TAB};

pub const CONFIG_ENV: &str = "JOTINHA_CONFIG";
pub const PASSWORD_ENV: &str = "JOTINHA_PASSWORD";
pub const SPREADSHEET_ENV: &str = "JOTINHA_SPREADSHEET";
pub const BACKEND_ENV: &str = "JOTINHA_BACKEND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Local,
    Google,
}

impl std::str::FromStr for Backend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "google" => Ok(Backend::Google),
            other => Err(ConfigError::InvalidValue {
                field: "backend",
                reason: format!("unknown backend '{other}' (expected local or google)"),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub backend: Backend,
    pub password: Option<String>,
    pub session_ttl_minutes: i64,
    pub sheets: SheetsConfig,
    pub google: GoogleConfig,
    pub local: LocalConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetsConfig {
    pub columns_tab: String,
    pub cards_tab: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleConfig {
    /// Spreadsheet id or its browser URL.
    pub spreadsheet: Option<String>,
    pub credentials_path: PathBuf,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    /// Defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            password: None,
            session_ttl_minutes: 12 * 60,
            sheets: SheetsConfig::default(),
            google: GoogleConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            columns_tab: COLUMNS_TAB.to_string(),
            cards_tab: CARDS_TAB.to_string(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            spreadsheet: None,
            credentials_path: PathBuf::from("credentials.json"),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl AppConfig {
    /// Reads the file named by `explicit`, `JOTINHA_CONFIG`, or the default
    /// location (in that order), applies environment overrides and validates.
    /// A missing default file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match named {
            Some(path) => Self::from_path(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(password) = lookup(PASSWORD_ENV) {
            self.password = Some(password);
        }
        if let Some(spreadsheet) = lookup(SPREADSHEET_ENV) {
            self.google.spreadsheet = Some(spreadsheet);
        }
        if let Some(backend) = lookup(BACKEND_ENV) {
            self.backend = backend.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheets.columns_tab.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sheets.columns_tab",
                reason: "must not be empty".to_string(),
            });
        }
        if self.sheets.cards_tab.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sheets.cards_tab",
                reason: "must not be empty".to_string(),
            });
        }
        if self.sheets.columns_tab == self.sheets.cards_tab {
            return Err(ConfigError::InvalidValue {
                field: "sheets.cards_tab",
                reason: "must differ from sheets.columns_tab".to_string(),
            });
        }
        if self.session_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "session_ttl_minutes",
                reason: "must be > 0".to_string(),
            });
        }
        if self.google.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "google.request_timeout_secs",
                reason: "must be > 0".to_string(),
            });
        }
        if self.backend == Backend::Google
            && self
                .google
                .spreadsheet
                .as_deref()
                .map_or(true, |s| s.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "google.spreadsheet",
                reason: format!("required for the google backend (or set {SPREADSHEET_ENV})"),
            });
        }
        Ok(())
    }

    pub fn layout(&self) -> SheetLayout {
        SheetLayout::new(&self.sheets.columns_tab, &self.sheets.cards_tab)
    }

    pub fn local_db_path(&self) -> anyhow::Result<PathBuf> {
        match &self.local.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "jotinha")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("jotinha.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let project_dirs = project_dirs().ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("board.sqlite"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = AppConfig::from_toml("").expect("empty config should parse");

        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.layout(), SheetLayout::default());
        assert_eq!(config.google.credentials_path, PathBuf::from("credentials.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            backend = "google"
            password = "s3cret"

            [sheets]
            columns_tab = "Lanes"

            [google]
            spreadsheet = "https://docs.google.com/spreadsheets/d/abc/edit"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.backend, Backend::Google);
        assert_eq!(config.password.as_deref(), Some("s3cret"));
        assert_eq!(config.layout(), SheetLayout::new("Lanes", "Cards"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_toml("colour = \"red\"").expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| match key {
                PASSWORD_ENV => Some("from-env".to_string()),
                BACKEND_ENV => Some("Google".to_string()),
                SPREADSHEET_ENV => Some("sheet-id".to_string()),
                _ => None,
            })
            .expect("overrides should apply");

        assert_eq!(config.password.as_deref(), Some("from-env"));
        assert_eq!(config.backend, Backend::Google);
        assert_eq!(config.google.spreadsheet.as_deref(), Some("sheet-id"));
    }

    #[test]
    fn validate_rejects_google_without_spreadsheet() {
        let config = AppConfig {
            backend: Backend::Google,
            ..AppConfig::default()
        };

        let err = config.validate().expect_err("spreadsheet is required");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "google.spreadsheet",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_shared_tab_names() {
        let mut config = AppConfig::default();
        config.sheets.cards_tab = config.sheets.columns_tab.clone();

        assert!(config.validate().is_err());
    }
}
