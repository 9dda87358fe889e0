//! TOML configuration for display geometry, the grid generator and the console.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::PortraitError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitConfig {
    pub display: DisplayConfig,
    pub generator: GeneratorConfig,
    pub console: ConsoleConfig,
}

impl PortraitConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, PortraitError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PortraitError> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// How grid cells are laid out on the drawing surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub cell_width: f64,
    pub cell_height: f64,
    pub font_px: f64,
    pub font_family: String,
    /// Backing-store pixels per surface unit.
    pub pixel_ratio: f64,
    pub frames_per_second: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width: 7.0,
            cell_height: 10.0,
            font_px: 9.0,
            font_family: String::from("\"JetBrains Mono\", monospace"),
            pixel_ratio: 1.0,
            frames_per_second: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub columns: u16,
    /// Fraction of the height where the shoulder taper starts.
    pub taper_start: f64,
    pub max_taper: usize,
    pub alpha_cutoff: u8,
    pub background_cutoff: u8,
    /// Glyph ramp from darkest to lightest.
    pub gradient: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            taper_start: 0.65,
            max_taper: 18,
            alpha_cutoff: 128,
            background_cutoff: 245,
            gradient: String::from("@%#*+=-:. "),
        }
    }
}

/// A console command that resolves to an external link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCommand {
    pub command: String,
    /// Ghost text shown while the command is typed.
    pub hint: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub links: Vec<LinkCommand>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let link = |command: &str, hint: &str, url: &str| LinkCommand {
            command: command.into(),
            hint: hint.into(),
            url: url.into(),
        };
        Self {
            links: vec![
                link(
                    "hi",
                    ">sendhi",
                    concat!(
                        "mailto:som@jakubsalmik.com?subject=Omg%20I%20wanna%20work%20with%20you",
                        "&body=Hi%2C%20I%20really%20love%20your%20work%2C%20I%20would%20like",
                        "%20to%20work%20with%20you.%20Please.",
                    ),
                ),
                link("rikej mi", ">instagram", "https://www.instagram.com/scoobysko/"),
                link(
                    "figma",
                    ">claude skill",
                    "https://github.com/scoobynko/claude-code-design-skills",
                ),
            ],
        }
    }
}
