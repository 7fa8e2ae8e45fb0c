use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::error::{CollectorError, Result};
use crate::service::report_service::PersistMode;

pub const DEFAULT_CONFIG_FILE: &str = ".env";
pub const DEFAULT_OUTPUT_PATH: &str = "outputs/event_count/event_count.csv";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;

/// Key/value pairs read from a dotenv-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CollectorError::ConfigFile {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content).map_err(|reason| CollectorError::ConfigFile {
            path: path.to_string(),
            reason,
        })
    }

    /// Loads `path` when given, otherwise `.env` if it exists.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Process environment first; the file only fills in unset keys.
    pub fn lookup(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.get(key))
    }
}

/// Everything one collection run needs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub output_path: PathBuf,
    pub mode: PersistMode,
    pub timezone: Tz,
}

impl Settings {
    pub fn resolve<F>(get_prop: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get_prop("URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| CollectorError::MissingConfig("URL".to_string()))?;

        let output_path = get_prop("OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        let mode = match get_prop("PERSIST_MODE") {
            Some(value) => value.parse().map_err(|_| CollectorError::InvalidConfig {
                key: "PERSIST_MODE".to_string(),
                value,
            })?,
            None => PersistMode::default(),
        };

        let timezone = match get_prop("REPORT_TIMEZONE") {
            Some(value) => value.parse::<Tz>().map_err(|_| CollectorError::InvalidConfig {
                key: "REPORT_TIMEZONE".to_string(),
                value,
            })?,
            None => DEFAULT_TIMEZONE,
        };

        Ok(Self {
            host: host.trim().to_string(),
            output_path,
            mode,
            timezone,
        })
    }
}
