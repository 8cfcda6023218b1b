// ============================================================================
// PixelGrid command line — startup overrides for the settings file
// ============================================================================
//
// Usage examples:
//   pixelgrid --size 32 --shape circle
//   pixelgrid --color "#ff8800" --grid-lines
//   pixelgrid --settings my_settings.cfg --fullscreen

use std::path::PathBuf;

use clap::Parser;

use crate::canvas::{GridError, Shape, parse_grid_size};
use crate::components::colors::Rgb;
use crate::settings::{AppSettings, SettingsError};

/// PixelGrid drawing canvas.
#[derive(Parser, Debug, Default)]
#[command(
    name = "pixelgrid",
    about = "Paint a grid of cells with solid, rainbow, gradient and darken modes"
)]
pub struct CliArgs {
    /// Cells per side (1-100).
    #[arg(short, long, value_name = "N")]
    pub size: Option<String>,

    /// Cell shape: square, circle, triangle, diamond.
    #[arg(long, value_name = "SHAPE")]
    pub shape: Option<String>,

    /// Initial solid color, e.g. "#000000".
    #[arg(short, long, value_name = "HEX")]
    pub color: Option<String>,

    /// Start with grid lines visible.
    #[arg(long)]
    pub grid_lines: bool,

    /// Start fullscreen.
    #[arg(long)]
    pub fullscreen: bool,

    /// Read settings from this file instead of the default location.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

#[derive(Debug)]
pub enum CliError {
    Grid(GridError),
    Color(crate::components::colors::ColorParseError),
    Settings(SettingsError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Grid(e) => write!(f, "{}", e),
            CliError::Color(e) => write!(f, "{}", e),
            CliError::Settings(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        CliError::Grid(e)
    }
}

impl From<crate::components::colors::ColorParseError> for CliError {
    fn from(e: crate::components::colors::ColorParseError) -> Self {
        CliError::Color(e)
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Settings(e)
    }
}

impl CliArgs {
    /// Settings file (explicit or default) with the command-line values on top.
    pub fn resolve_settings(&self) -> Result<AppSettings, CliError> {
        let base = match &self.settings {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load(),
        };
        self.apply_to(base)
    }

    pub fn apply_to(&self, mut settings: AppSettings) -> Result<AppSettings, CliError> {
        if let Some(size) = &self.size {
            settings.grid_size = parse_grid_size(size)?;
        }
        if let Some(shape) = &self.shape {
            settings.shape = shape.parse::<Shape>()?;
        }
        if let Some(color) = &self.color {
            settings.solid_color = Rgb::from_hex(color)?;
        }
        settings.grid_lines |= self.grid_lines;
        settings.fullscreen |= self.fullscreen;
        Ok(settings)
    }
}
