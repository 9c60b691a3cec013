use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::header::SnapMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
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
    /// Log level
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

/// Geometry and snapping behavior of the scaling header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Height of the fully collapsed header
    #[serde(default = "default_min_height")]
    pub min_height: f64,
    /// Height of the fully expanded header
    #[serde(default = "default_max_height")]
    pub max_height: f64,
    /// When the header settles to an edge height
    #[serde(default)]
    pub snap_mode: SnapMode,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            min_height: default_min_height(),
            max_height: default_max_height(),
            snap_mode: SnapMode::default(),
        }
    }
}

impl HeaderConfig {
    /// Heights with `min <= max` and neither negative
    pub fn normalized_heights(&self) -> (f64, f64) {
        let min = self.min_height.max(0.0);
        let max = self.max_height.max(0.0);
        if min > max {
            (max, min)
        } else {
            (min, max)
        }
    }
}

/// Gesture thresholds of the scroll contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Overscroll distance past either edge that counts as a pull gesture
    #[serde(default = "default_pull_threshold")]
    pub pull_threshold: f64,
    /// Release velocity at or above which a flick overrides the nearest-edge snap
    #[serde(default = "default_flick_velocity")]
    pub flick_velocity: f64,
    /// Scroll units per terminal row (terminal host only)
    #[serde(default = "default_row_units")]
    pub row_units: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            pull_threshold: default_pull_threshold(),
            flick_velocity: default_flick_velocity(),
            row_units: default_row_units(),
        }
    }
}

/// Easing curve used by snap transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the duration
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Animate snap transitions; when false the header jumps to its target
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while an animation is running
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            duration_ms: default_duration_ms(),
            easing: EasingType::default(),
            fps: default_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Theme name: "gruvbox-dark" or "nord"
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Number of demo rows in the body
    #[serde(default = "default_body_rows")]
    pub body_rows: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            theme: default_theme_name(),
            body_rows: default_body_rows(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-d>" (Ctrl+d), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Drag the content up by one row
    #[serde(default = "default_key_drag_down")]
    pub drag_down: String,
    /// Drag the content down by one row
    #[serde(default = "default_key_drag_up")]
    pub drag_up: String,
    /// Flick toward the bottom
    #[serde(default = "default_key_flick_down")]
    pub flick_down: String,
    /// Flick toward the top
    #[serde(default = "default_key_flick_up")]
    pub flick_up: String,
    /// Expand the header programmatically
    #[serde(default = "default_key_expand")]
    pub expand: String,
    /// Collapse the header programmatically
    #[serde(default = "default_key_collapse")]
    pub collapse: String,
    /// Cycle through snap modes
    #[serde(default = "default_key_cycle_snap_mode")]
    pub cycle_snap_mode: String,
    /// Finish a pending refresh or load-more
    #[serde(default = "default_key_finish_loading")]
    pub finish_loading: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            drag_down: default_key_drag_down(),
            drag_up: default_key_drag_up(),
            flick_down: default_key_flick_down(),
            flick_up: default_key_flick_up(),
            expand: default_key_expand(),
            collapse: default_key_collapse(),
            cycle_snap_mode: default_key_cycle_snap_mode(),
            finish_loading: default_key_finish_loading(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_drag_down() -> String { "j".to_string() }
fn default_key_drag_up() -> String { "k".to_string() }
fn default_key_flick_down() -> String { "<C-d>".to_string() }
fn default_key_flick_up() -> String { "<C-u>".to_string() }
fn default_key_expand() -> String { "e".to_string() }
fn default_key_collapse() -> String { "c".to_string() }
fn default_key_cycle_snap_mode() -> String { "m".to_string() }
fn default_key_finish_loading() -> String { "<CR>".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scalehead")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_height() -> f64 {
    24.0
}

fn default_max_height() -> f64 {
    96.0
}

fn default_pull_threshold() -> f64 {
    60.0
}

fn default_flick_velocity() -> f64 {
    1.5
}

fn default_row_units() -> f64 {
    8.0
}

fn default_duration_ms() -> u64 {
    180
}

fn default_fps() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_body_rows() -> usize {
    80
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
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration document; missing sections take their defaults
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scalehead/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scalehead")
            .join("config.toml")
    }

    /// Get the log file path used by the terminal UI
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scalehead.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.header.min_height, 24.0);
        assert_eq!(config.header.max_height, 96.0);
        assert_eq!(config.header.snap_mode, SnapMode::Immediate);
        assert_eq!(config.scroll.pull_threshold, 60.0);
        assert_eq!(config.animation.easing, EasingType::Cubic);
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [header]
            max_height = 120.0
            snap_mode = "after_deceleration"

            [animation]
            easing = "ease_out"
            "#,
        )
        .unwrap();

        assert_eq!(config.header.max_height, 120.0);
        assert_eq!(config.header.min_height, 24.0);
        assert_eq!(config.header.snap_mode, SnapMode::AfterDeceleration);
        assert_eq!(config.animation.easing, EasingType::EaseOut);
        assert_eq!(config.animation.duration_ms, 180);
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_round_trip() {
        let mut config = AppConfig::default();
        config.header.snap_mode = SnapMode::Disabled;
        config.scroll.flick_velocity = 3.0;

        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.header.snap_mode, SnapMode::Disabled);
        assert_eq!(parsed.scroll.flick_velocity, 3.0);
    }

    #[test]
    fn test_invalid_snap_mode_is_error() {
        let result = AppConfig::from_toml("[header]\nsnap_mode = \"sometimes\"\n");
        assert!(matches!(result, Err(crate::Error::Toml(_))));
    }

    #[test]
    fn test_normalized_heights() {
        let header = HeaderConfig {
            min_height: 200.0,
            max_height: 50.0,
            snap_mode: SnapMode::Disabled,
        };
        assert_eq!(header.normalized_heights(), (50.0, 200.0));

        let header = HeaderConfig {
            min_height: -10.0,
            max_height: 40.0,
            snap_mode: SnapMode::Disabled,
        };
        assert_eq!(header.normalized_heights(), (0.0, 40.0));
    }
}
