use cepcheck_core::config::{ThemeColorOverrides, ThemeConfig};
use cepcheck_core::Category;
use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_alt: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub link: Color,
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        gruvbox_dark()
    }
}

impl Theme {
    /// Border/title color of the result panel for a category
    pub fn category_color(&self, category: Category) -> Color {
        match category {
            Category::Success => self.success,
            Category::Error => self.error,
            Category::Info => self.info,
        }
    }
}

fn gruvbox_dark() -> Theme {
    Theme {
        bg: Color::Rgb(0x28, 0x28, 0x28),
        bg_alt: Color::Rgb(0x45, 0x40, 0x3d),
        fg: Color::Rgb(0xd4, 0xbe, 0x98),
        muted: Color::Rgb(0x92, 0x83, 0x74),
        accent: Color::Rgb(0x89, 0xb4, 0x82),
        link: Color::Rgb(0x7d, 0xae, 0xa3),
        success: Color::Rgb(0xa9, 0xb6, 0x65),
        error: Color::Rgb(0xea, 0x69, 0x62),
        info: Color::Rgb(0xd8, 0xa6, 0x57),
    }
}

fn gruvbox_light() -> Theme {
    Theme {
        bg: Color::Rgb(0xfb, 0xf1, 0xc7),
        bg_alt: Color::Rgb(0xeb, 0xdb, 0xb2),
        fg: Color::Rgb(0x65, 0x47, 0x35),
        muted: Color::Rgb(0x92, 0x83, 0x74),
        accent: Color::Rgb(0x4c, 0x7a, 0x5d),
        link: Color::Rgb(0x45, 0x70, 0x7a),
        success: Color::Rgb(0x6c, 0x78, 0x2e),
        error: Color::Rgb(0xc1, 0x4a, 0x4a),
        info: Color::Rgb(0xb4, 0x71, 0x09),
    }
}

/// Parse "#RRGGBB", "RRGGBB", "#RGB" or "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Load a theme by name, then apply color overrides
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "gruvbox-light" => gruvbox_light(),
        "gruvbox-dark" => gruvbox_dark(),
        other => {
            tracing::warn!("Unknown theme '{}', using gruvbox-dark", other);
            gruvbox_dark()
        }
    };

    apply_overrides(base, &config.colors)
}

fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    let slots: [(&Option<String>, &mut Color); 7] = [
        (&overrides.bg, &mut theme.bg),
        (&overrides.fg, &mut theme.fg),
        (&overrides.muted, &mut theme.muted),
        (&overrides.accent, &mut theme.accent),
        (&overrides.success, &mut theme.success),
        (&overrides.error, &mut theme.error),
        (&overrides.info, &mut theme.info),
    ];

    for (hex, slot) in slots {
        if let Some(hex) = hex {
            match parse_hex_color(hex) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid color override '{}'", hex),
            }
        }
    }

    theme
}
