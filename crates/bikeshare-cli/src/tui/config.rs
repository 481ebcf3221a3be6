use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use ratatui::style::Color;
use serde::Deserialize;

static CONFIG: OnceLock<BikeshareConfig> = OnceLock::new();

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BikeshareConfig {
    #[serde(default)]
    pub colors: ColorsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorsConfig {
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub soft: Option<String>,
    #[serde(default)]
    pub line: Option<String>,
}

impl BikeshareConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bikeshare"))
    }

    pub fn load() -> &'static BikeshareConfig {
        CONFIG.get_or_init(|| {
            Self::config_path()
                .and_then(|path| fs::read_to_string(path).ok())
                .and_then(|content| toml::from_str(&content).ok())
                .unwrap_or_default()
        })
    }

    pub fn accent_color(&self) -> Option<Color> {
        self.colors.accent.as_deref().and_then(parse_hex_color)
    }

    pub fn soft_color(&self) -> Option<Color> {
        self.colors.soft.as_deref().and_then(parse_hex_color)
    }

    pub fn line_color(&self) -> Option<Color> {
        self.colors.line.as_deref().and_then(parse_hex_color)
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
