use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use bikeshare_core::DEFAULT_TOP_DAYS;
use serde::{Deserialize, Serialize};

use super::themes::ThemeName;

pub const DAY_FILE_ENV: &str = "BIKESHARE_DAY_FILE";
pub const HOUR_FILE_ENV: &str = "BIKESHARE_HOUR_FILE";

const DEFAULT_DAY_FILE: &str = "all_day.csv";
const DEFAULT_HOUR_FILE: &str = "all_hour.csv";
const MAX_TOP_DAYS: usize = 31;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_day_file")]
    pub day_file: String,
    #[serde(default = "default_hour_file")]
    pub hour_file: String,
    #[serde(default = "default_top_days")]
    pub top_days: usize,
}

fn default_theme() -> String {
    ThemeName::Rose.as_str().to_string()
}

fn default_day_file() -> String {
    DEFAULT_DAY_FILE.to_string()
}

fn default_hour_file() -> String {
    DEFAULT_HOUR_FILE.to_string()
}

fn default_top_days() -> usize {
    DEFAULT_TOP_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            day_file: default_day_file(),
            hour_file: default_hour_file(),
            top_days: DEFAULT_TOP_DAYS,
        }
    }
}

impl Settings {
    /// `<config dir>/bikeshare/settings.json`, if the platform has a config dir.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bikeshare").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or unreadable files give the defaults.
    pub fn load_from(path: &Path) -> Self {
        let settings: Self = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        settings.normalized()
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.top_days = self.top_days.clamp(1, MAX_TOP_DAYS);
        self
    }

    pub fn theme_name(&self) -> ThemeName {
        self.theme.parse().unwrap_or(ThemeName::Rose)
    }

    pub fn set_theme(&mut self, theme: ThemeName) {
        self.theme = theme.as_str().to_string();
    }

    /// Priority: --day-file flag > BIKESHARE_DAY_FILE env var > settings.json > all_day.csv
    pub fn resolve_day_file(&self, flag: Option<&Path>) -> PathBuf {
        resolve_path(flag, std::env::var(DAY_FILE_ENV).ok(), &self.day_file)
    }

    /// Priority: --hour-file flag > BIKESHARE_HOUR_FILE env var > settings.json > all_hour.csv
    pub fn resolve_hour_file(&self, flag: Option<&Path>) -> PathBuf {
        resolve_path(flag, std::env::var(HOUR_FILE_ENV).ok(), &self.hour_file)
    }
}

fn resolve_path(flag: Option<&Path>, env_val: Option<String>, configured: &str) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match env_val {
        Some(val) if !val.trim().is_empty() => PathBuf::from(val),
        _ => PathBuf::from(configured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_creates_dir_and_round_trips() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested/bikeshare/settings.json");
        let mut settings = Settings::default();
        settings.set_theme(ThemeName::Forest);
        settings.top_days = 7;

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.theme_name(), ThemeName::Forest);
        assert_eq!(loaded.top_days, 7);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"topDays\": 7"));
    }

    #[test]
    fn test_load_from_missing_or_invalid_file_gives_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = Settings::load_from(&tmp.path().join("absent.json"));
        assert_eq!(missing.theme_name(), ThemeName::Rose);

        let broken = tmp.path().join("settings.json");
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&broken).top_days, 5);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme_name(), ThemeName::Rose);
        assert_eq!(settings.day_file, "all_day.csv");
        assert_eq!(settings.hour_file, "all_hour.csv");
        assert_eq!(settings.top_days, 5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"ocean"}"#).unwrap();
        assert_eq!(settings.theme_name(), ThemeName::Ocean);
        assert_eq!(settings.day_file, "all_day.csv");
        assert_eq!(settings.top_days, 5);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"dayFile\""));
        assert!(json.contains("\"topDays\""));
    }

    #[test]
    fn test_unknown_theme_falls_back_to_rose() {
        let settings = Settings {
            theme: "neon".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.theme_name(), ThemeName::Rose);
    }

    #[test]
    fn test_top_days_is_clamped() {
        let settings = Settings {
            top_days: 0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings.top_days, 1);
    }

    #[test]
    fn test_path_priority() {
        let flag = Path::new("flag.csv");
        assert_eq!(
            resolve_path(Some(flag), Some("env.csv".to_string()), "settings.csv"),
            PathBuf::from("flag.csv")
        );
        assert_eq!(
            resolve_path(None, Some("env.csv".to_string()), "settings.csv"),
            PathBuf::from("env.csv")
        );
        assert_eq!(
            resolve_path(None, Some("  ".to_string()), "settings.csv"),
            PathBuf::from("settings.csv")
        );
        assert_eq!(
            resolve_path(None, None, "settings.csv"),
            PathBuf::from("settings.csv")
        );
    }
}
