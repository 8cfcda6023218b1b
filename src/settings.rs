use std::fmt;
use std::path::{Path, PathBuf};

use crate::canvas::{DEFAULT_GRID_SIZE, Shape, validate_grid_size};
use crate::components::colors::Rgb;
use crate::session::SessionConfig;
use crate::log_warn;

/// Startup preferences read from `pixelgrid_settings.cfg`.
///
/// The file is plain `key = value` lines and is never written by the
/// application; drawings themselves are not persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct AppSettings {
    pub grid_size: usize,
    pub shape: Shape,
    pub solid_color: Rgb,
    pub grid_lines: bool,
    /// 0 means unlimited.
    pub max_undo_steps: usize,
    pub fullscreen: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            shape: Shape::Square,
            solid_color: Rgb::BLACK,
            grid_lines: false,
            max_undo_steps: 0,
            fullscreen: false,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(PathBuf, std::io::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(_, e) => Some(e),
        }
    }
}

impl AppSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelgrid/pixelgrid_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\PixelGrid\pixelgrid_settings.cfg
    /// On macOS:   ~/Library/Application Support/PixelGrid/pixelgrid_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            return std::env::var("APPDATA")
                .ok()
                .map(|appdata| PathBuf::from(appdata).join("PixelGrid").join("pixelgrid_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            return std::env::var("HOME").ok().map(|home| {
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("PixelGrid")
                    .join("pixelgrid_settings.cfg")
            });
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
                .ok()?;
            Some(config_dir.join("pixelgrid").join("pixelgrid_settings.cfg"))
        }
    }

    /// Load from the default location; a missing or unreadable file gives defaults.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            log_warn!("settings: {}", e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(path.to_path_buf(), e))?;
        Ok(Self::parse(&content))
    }

    /// Parse settings text. Unknown keys and bad values are skipped.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                log_warn!("settings: line {} has no '=': {}", line_no + 1, line);
                continue;
            };
            let key = key.trim();
            let val = val.trim();
            let applied = match key {
                "grid_size" => val
                    .parse()
                    .ok()
                    .and_then(|n| validate_grid_size(n).ok())
                    .map(|n| s.grid_size = n),
                "shape" => val.parse().ok().map(|shape| s.shape = shape),
                "solid_color" => Rgb::from_hex(val).ok().map(|c| s.solid_color = c),
                "grid_lines" => parse_bool(val).map(|b| s.grid_lines = b),
                "max_undo_steps" => val.parse().ok().map(|n| s.max_undo_steps = n),
                "fullscreen" => parse_bool(val).map(|b| s.fullscreen = b),
                _ => {
                    log_warn!("settings: unknown key '{}'", key);
                    Some(())
                }
            };
            if applied.is_none() {
                log_warn!("settings: ignoring bad value for '{}': {}", key, val);
            }
        }
        s
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            grid_size: self.grid_size,
            shape: self.shape,
            solid_color: self.solid_color,
            max_undo_steps: (self.max_undo_steps > 0).then_some(self.max_undo_steps),
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
