// Softkey Settings Module
// User-tunable gesture timings and the compose toggle

#![cfg(feature = "config")]

use std::path::{Path, PathBuf};

use crate::input::GestureConfig;
use crate::keyboard::KeyboardOptions;

/// Settings loaded from a TOML file (default: ~/.config/softkey/settings.toml)
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Gesture timing and swipe distance
    gesture: GestureConfig,

    /// Run glyphs through dead keys and transform rules
    compose_enabled: bool,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    gesture: Option<GestureSettings>,

    #[serde(default)]
    compose: Option<ComposeSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct GestureSettings {
    long_press_ms: Option<i64>,
    double_click_ms: Option<i64>,
    swipe_threshold: Option<f64>,
    repeat_delay_ms: Option<i64>,
    repeat_interval_ms: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ComposeSettings {
    enabled: Option<toml::Value>,
}

impl Settings {
    pub fn new() -> Self {
        Self {
            gesture: GestureConfig::default(),
            compose_enabled: true,
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(gesture) = toml_settings.gesture {
            let timing = &mut settings.gesture;
            if let Some(ms) = gesture.long_press_ms {
                timing.long_press_ms = parse_millis("long_press_ms", ms)?;
            }
            if let Some(ms) = gesture.double_click_ms {
                timing.double_click_ms = parse_millis("double_click_ms", ms)?;
            }
            if let Some(ms) = gesture.repeat_delay_ms {
                timing.repeat_delay_ms = parse_millis("repeat_delay_ms", ms)?;
            }
            if let Some(ms) = gesture.repeat_interval_ms {
                timing.repeat_interval_ms = parse_millis("repeat_interval_ms", ms)?;
            }
            if let Some(threshold) = gesture.swipe_threshold {
                if !(threshold.is_finite() && threshold > 0.0) {
                    return Err(SettingsError::InvalidValue(format!(
                        "swipe_threshold must be positive, got {}",
                        threshold
                    )));
                }
                timing.swipe_threshold = threshold;
            }
        }

        if let Some(compose) = toml_settings.compose {
            if let Some(value) = compose.enabled {
                settings.compose_enabled = parse_bool_value(&value)?;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("softkey").join("settings.toml"))
    }

    /// Load from default location, falling back to defaults when absent
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        log::debug!("no settings file, using defaults");
        Ok(Self::new())
    }

    pub fn gesture(&self) -> GestureConfig {
        self.gesture
    }

    pub fn compose_enabled(&self) -> bool {
        self.compose_enabled
    }

    pub fn set_compose_enabled(&mut self, enabled: bool) {
        self.compose_enabled = enabled;
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Options for a new [`Keyboard`](crate::Keyboard) session
    pub fn keyboard_options(&self) -> KeyboardOptions {
        KeyboardOptions {
            gesture: self.gesture,
            compose: self.compose_enabled,
        }
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }
}

fn parse_millis(name: &str, value: i64) -> Result<u64, SettingsError> {
    if value <= 0 {
        return Err(SettingsError::InvalidValue(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(value as u64)
}

/// Parse a TOML value as a boolean
fn parse_bool_value(value: &toml::Value) -> Result<bool, SettingsError> {
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::Integer(1) => Ok(true),
        toml::Value::Integer(0) => Ok(false),
        toml::Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(SettingsError::InvalidValue(format!(
                "Cannot convert '{}' to boolean",
                s
            ))),
        },
        _ => Err(SettingsError::InvalidValue(format!(
            "Cannot convert {:?} to boolean",
            value
        ))),
    }
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Softkey Settings
# Place this file at: ~/.config/softkey/settings.toml

[gesture]
# Hold time before a long-press fires
long_press_ms = 500
# Maximum gap between two taps of a double-click
double_click_ms = 500
# Pointer travel (px) on one axis that counts as a swipe
swipe_threshold = 20.0
# Backspace auto-repeat
repeat_delay_ms = 300
repeat_interval_ms = 75

[compose]
# Dead keys and transform rules
enabled = true
"#
}
