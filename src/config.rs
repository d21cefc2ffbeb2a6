use crate::error::{Error, Result};
use crate::show::Rgb;
use crate::show::director::{AnimePlan, ClassicPlan, ShowPlan, ShowStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub classic: Vec<String>,
    pub anime: Vec<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            classic: vec![
                "Happy Birthday!".into(),
                "Wishing you a wonderful year".into(),
            ],
            anime: vec![
                "Happy Birthday!".into(),
                "Another year of adventures".into(),
                "Make a wish and look up".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: ShowStyle,
    /// World units per half-block pixel.
    pub pixels_per_cell: f32,
    /// Backdrop color, hex RRGGBB.
    pub background: String,
    pub message_color: String,
    pub trail_fade: f32,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub classic: ClassicPlan,
    pub anime: AnimePlan,
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: ShowStyle::Classic,
            pixels_per_cell: 6.0,
            background: "1a1a2e".into(),
            message_color: "ffd1dc".into(),
            trail_fade: 0.1,
            seed: None,
            log_file: None,
            classic: ClassicPlan::default(),
            anime: AnimePlan::default(),
            messages: Messages::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pixels_per_cell > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "pixels_per_cell must be positive, got {}",
                self.pixels_per_cell
            )));
        }
        if !(self.trail_fade > 0.0 && self.trail_fade <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "trail_fade must be in (0, 1], got {}",
                self.trail_fade
            )));
        }
        self.background_rgb()?;
        self.message_rgb()?;
        Ok(())
    }

    pub fn background_rgb(&self) -> Result<Rgb> {
        parse_hex_color(&self.background)
            .ok_or_else(|| Error::InvalidColor(self.background.clone()))
    }

    pub fn message_rgb(&self) -> Result<Rgb> {
        parse_hex_color(&self.message_color)
            .ok_or_else(|| Error::InvalidColor(self.message_color.clone()))
    }

    pub fn show_plan(&self) -> Result<ShowPlan> {
        let messages = match self.style {
            ShowStyle::Classic => self.messages.classic.clone(),
            ShowStyle::Anime => self.messages.anime.clone(),
        };
        Ok(ShowPlan {
            style: self.style,
            classic: self.classic.clone(),
            anime: self.anime.clone(),
            backdrop: self.background_rgb()?,
            trail_fade: self.trail_fade,
            messages,
        })
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
