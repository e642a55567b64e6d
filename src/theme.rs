//! Colour palette for the thermometer UI.
//! Optionally read from a kitty-style colour file (`key #rrggbb` per line).

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Focused borders, key hints
    pub mercury: Color,     // Thermometer fill (color1/red)
    pub mercury_top: Color, // Top row of the fill (color9)
    pub glass: Color,       // Empty part of the tube
    pub target_line: Color, // Target marker (color2/green)
    pub success: Color,
    pub warning: Color,     // Status line
    pub danger: Color,
    pub text: Color,
    pub text_dim: Color,
    pub bg_selected: Color, // Highlighted button background
    pub inactive: Color,    // Unfocused borders
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(137, 180, 250),
            mercury: Color::Rgb(220, 38, 38),
            mercury_top: Color::Rgb(239, 68, 68),
            glass: Color::Rgb(49, 50, 68),
            target_line: Color::Rgb(34, 197, 94),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(180, 190, 254),
        }
    }
}

impl Theme {
    /// Load from `path` when given and readable, otherwise the built-in palette
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_colors(&Self::parse_kitty_conf(&content)),
            Err(e) => {
                tracing::warn!("Could not read theme file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Map named colours onto the palette; missing keys keep the default
    fn from_colors(colors: &HashMap<String, Color>) -> Self {
        let base = Self::default();
        let pick = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k))
                .copied()
                .unwrap_or(fallback)
        };

        Self {
            accent: pick(&["color4", "color12"], base.accent),
            mercury: pick(&["color1"], base.mercury),
            mercury_top: pick(&["color9", "color1"], base.mercury_top),
            glass: pick(&["color0", "selection_background"], base.glass),
            target_line: pick(&["color2", "color10"], base.target_line),
            success: pick(&["color10", "color2"], base.success),
            warning: pick(&["color3", "color11"], base.warning),
            danger: pick(&["color9", "color1"], base.danger),
            text: pick(&["foreground"], base.text),
            text_dim: pick(&["color8"], base.text_dim),
            bg_selected: pick(&["selection_background", "color0"], base.bg_selected),
            inactive: pick(&["inactive_border_color", "color8"], base.inactive),
            header: pick(&["color5", "color13"], base.header),
        }
    }

    /// Parse kitty.conf format: `key value` or `key #hexcolor`
    fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once(char::is_whitespace) {
                if let Some(color) = Self::parse_hex_color(value) {
                    colors.insert(key.trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}
