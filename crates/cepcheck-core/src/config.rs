use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the ViaCEP-compatible API, without the trailing `/{cep}/json/`
    #[serde(default = "default_lookup_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (unset = no timeout)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// User-Agent header sent with every lookup
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_lookup_base_url(),
            request_timeout_secs: None,
            proxy_url: None,
            user_agent: default_user_agent(),
        }
    }
}

/// The region the business serves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Two-letter state code (UF) that is served
    #[serde(default = "default_supported_uf")]
    pub supported_uf: String,
    /// Human readable name of the served region, used in messages
    #[serde(default = "default_region_name")]
    pub region_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            supported_uf: default_supported_uf(),
            region_name: default_region_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Page document to show instead of the built-in landing page
    #[serde(default)]
    pub page_path: Option<PathBuf>,
    /// Smooth scrolling
    #[serde(default)]
    pub scroll: ScrollConfig,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            page_path: None,
            scroll: ScrollConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Easing curve applied to scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    #[serde(alias = "ease_out", alias = "ease-out")]
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Lines per scroll step when smooth scrolling is off
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme name) or as a table with overrides
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    /// Theme name ("gruvbox-dark" or "gruvbox-light")
    pub name: String,
    /// Optional color overrides for semantic colors
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string (theme name) or a map with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

/// Optional color overrides, each a hex string ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub muted: Option<String>,
    pub accent: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-d>" (Ctrl+d), "<S-Tab>" (Shift+Tab), "<CR>" (Enter), "gg"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Move focus page -> CEP input -> submit button
    #[serde(default = "default_key_focus_next")]
    pub focus_next: String,
    #[serde(default = "default_key_focus_prev")]
    pub focus_prev: String,
    /// Select the next link on the page
    #[serde(default = "default_key_next_link")]
    pub next_link: String,
    #[serde(default = "default_key_prev_link")]
    pub prev_link: String,
    /// Follow the selected link
    #[serde(default = "default_key_follow_link")]
    pub follow_link: String,
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_key_scroll_half_down")]
    pub scroll_half_down: String,
    #[serde(default = "default_key_scroll_half_up")]
    pub scroll_half_up: String,
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            focus_next: default_key_focus_next(),
            focus_prev: default_key_focus_prev(),
            next_link: default_key_next_link(),
            prev_link: default_key_prev_link(),
            follow_link: default_key_follow_link(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            scroll_half_down: default_key_scroll_half_down(),
            scroll_half_up: default_key_scroll_half_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_focus_next() -> String { "<Tab>".to_string() }
fn default_key_focus_prev() -> String { "<S-Tab>".to_string() }
fn default_key_next_link() -> String { "n".to_string() }
fn default_key_prev_link() -> String { "p".to_string() }
fn default_key_follow_link() -> String { "<CR>".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_scroll_half_down() -> String { "<C-d>".to_string() }
fn default_key_scroll_half_up() -> String { "<C-u>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cepcheck")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_lookup_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

fn default_user_agent() -> String {
    format!("cepcheck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_supported_uf() -> String {
    "SP".to_string()
}

fn default_region_name() -> String {
    "São Paulo".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_duration() -> u64 {
    300
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_animation_fps() -> u32 {
    60
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/cepcheck/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("cepcheck")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("cepcheck.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the custom page path (with tilde expansion)
    pub fn page_path(&self) -> Option<PathBuf> {
        self.ui.page_path.as_deref().map(expand_tilde)
    }
}
