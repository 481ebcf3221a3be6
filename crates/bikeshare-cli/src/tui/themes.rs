use ratatui::style::Color;

use super::config::BikeshareConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Rose,
    Ocean,
    Forest,
    Mono,
}

impl ThemeName {
    pub fn all() -> &'static [ThemeName] {
        &[
            ThemeName::Rose,
            ThemeName::Ocean,
            ThemeName::Forest,
            ThemeName::Mono,
        ]
    }

    pub fn next(self) -> ThemeName {
        let themes = Self::all();
        let idx = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(idx + 1) % themes.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Rose => "rose",
            ThemeName::Ocean => "ocean",
            ThemeName::Forest => "forest",
            ThemeName::Mono => "mono",
        }
    }
}

impl std::str::FromStr for ThemeName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rose" => Ok(ThemeName::Rose),
            "ocean" => Ok(ThemeName::Ocean),
            "forest" => Ok(ThemeName::Forest),
            "mono" | "monochrome" => Ok(ThemeName::Mono),
            _ => Err(()),
        }
    }
}

/// Chart colors: `accent` marks the standout bar (peak hour, best day,
/// largest category), `soft` fills the rest, `line` draws the daily trend.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub accent: Color,
    pub soft: Color,
    pub line: Color,
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub muted: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        let (accent, soft, line) = match name {
            // #E17F93 / #F4C2C2
            ThemeName::Rose => (
                Color::Rgb(225, 127, 147),
                Color::Rgb(244, 194, 194),
                Color::Rgb(225, 127, 147),
            ),
            ThemeName::Ocean => (
                Color::Rgb(29, 145, 192),
                Color::Rgb(161, 218, 236),
                Color::Rgb(65, 182, 196),
            ),
            ThemeName::Forest => (
                Color::Rgb(38, 166, 65),
                Color::Rgb(172, 222, 170),
                Color::Rgb(57, 211, 83),
            ),
            ThemeName::Mono => (
                Color::Rgb(200, 205, 212),
                Color::Rgb(110, 115, 122),
                Color::Rgb(200, 205, 212),
            ),
        };

        Self {
            name,
            accent,
            soft,
            line,
            background: Color::Rgb(13, 17, 23),
            foreground: Color::Rgb(201, 209, 217),
            border: Color::Rgb(48, 54, 61),
            muted: Color::Rgb(139, 148, 158),
        }
    }

    /// Built-in theme with any `[colors]` overrides from `~/.bikeshare` applied.
    pub fn load(name: ThemeName) -> Self {
        Self::from_name(name).with_overrides(BikeshareConfig::load())
    }

    pub fn with_overrides(mut self, config: &BikeshareConfig) -> Self {
        if let Some(color) = config.accent_color() {
            self.accent = color;
        }
        if let Some(color) = config.soft_color() {
            self.soft = color;
        }
        if let Some(color) = config.line_color() {
            self.line = color;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::config::ColorsConfig;

    #[test]
    fn test_theme_cycle_wraps() {
        let mut name = ThemeName::Rose;
        for _ in 0..ThemeName::all().len() {
            name = name.next();
        }
        assert_eq!(name, ThemeName::Rose);
    }

    #[test]
    fn test_theme_name_parse() {
        assert_eq!("Ocean".parse::<ThemeName>(), Ok(ThemeName::Ocean));
        assert_eq!("monochrome".parse::<ThemeName>(), Ok(ThemeName::Mono));
        assert!("neon".parse::<ThemeName>().is_err());
    }

    #[test]
    fn test_rose_palette() {
        let theme = Theme::from_name(ThemeName::Rose);
        assert_eq!(theme.accent, Color::Rgb(0xE1, 0x7F, 0x93));
        assert_eq!(theme.soft, Color::Rgb(0xF4, 0xC2, 0xC2));
    }

    #[test]
    fn test_overrides_replace_only_given_colors() {
        let config = BikeshareConfig {
            colors: ColorsConfig {
                accent: Some("#102030".to_string()),
                soft: Some("not-a-color".to_string()),
                line: None,
            },
        };
        let base = Theme::from_name(ThemeName::Rose);
        let theme = Theme::from_name(ThemeName::Rose).with_overrides(&config);
        assert_eq!(theme.accent, Color::Rgb(0x10, 0x20, 0x30));
        assert_eq!(theme.soft, base.soft);
        assert_eq!(theme.line, base.line);
    }
}
