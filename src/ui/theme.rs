use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub move_correct: String,
    pub move_error: String,
    pub move_pending: String,
    pub move_neutral: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in the config dir shadow the built-in palettes.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("cubedex")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return Some(theme);
                }
            }
        }

        builtin(name)
    }

    pub fn available_themes() -> Vec<String> {
        vec![
            "terminal-default".to_string(),
            "catppuccin-mocha".to_string(),
            "high-contrast".to_string(),
        ]
    }
}

fn builtin(name: &str) -> Option<Theme> {
    let colors = match name {
        "terminal-default" => ThemeColors::default(),
        "catppuccin-mocha" => ThemeColors {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            move_correct: "#a6e3a1".to_string(),
            move_error: "#f38ba8".to_string(),
            move_pending: "#89dceb".to_string(),
            move_neutral: "#585b70".to_string(),
            accent: "#89b4fa".to_string(),
            accent_dim: "#45475a".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
            success: "#a6e3a1".to_string(),
        },
        "high-contrast" => ThemeColors {
            bg: "#000000".to_string(),
            fg: "#ffffff".to_string(),
            move_correct: "#00ff00".to_string(),
            move_error: "#ff0000".to_string(),
            move_pending: "#00ffff".to_string(),
            move_neutral: "#aaaaaa".to_string(),
            accent: "#ffff00".to_string(),
            accent_dim: "#555555".to_string(),
            border: "#ffffff".to_string(),
            border_focused: "#ffff00".to_string(),
            header_bg: "#222222".to_string(),
            header_fg: "#ffffff".to_string(),
            error: "#ff0000".to_string(),
            warning: "#ffff00".to_string(),
            success: "#00ff00".to_string(),
        },
        _ => return None,
    };
    Some(Theme {
        name: name.to_string(),
        colors,
    })
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "terminal-default".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1a1b26".to_string(),
            fg: "#c0caf5".to_string(),
            move_correct: "#9ece6a".to_string(),
            move_error: "#f7768e".to_string(),
            move_pending: "#7dcfff".to_string(),
            move_neutral: "#565f89".to_string(),
            accent: "#7aa2f7".to_string(),
            accent_dim: "#414868".to_string(),
            border: "#414868".to_string(),
            border_focused: "#7aa2f7".to_string(),
            header_bg: "#24283b".to_string(),
            header_fg: "#c0caf5".to_string(),
            error: "#f7768e".to_string(),
            warning: "#e0af68".to_string(),
            success: "#9ece6a".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn move_correct(&self) -> Color { Self::parse_color(&self.move_correct) }
    pub fn move_error(&self) -> Color { Self::parse_color(&self.move_error) }
    pub fn move_pending(&self) -> Color { Self::parse_color(&self.move_pending) }
    pub fn move_neutral(&self) -> Color { Self::parse_color(&self.move_neutral) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(
            ThemeColors::parse_color("#ff8000"),
            Color::Rgb(255, 128, 0)
        );
        assert_eq!(ThemeColors::parse_color("zzz"), Color::White);
    }

    #[test]
    fn builtin_themes_all_load() {
        for name in Theme::available_themes() {
            assert!(builtin(&name).is_some(), "{name}");
        }
        assert!(builtin("no-such-theme").is_none());
    }
}
