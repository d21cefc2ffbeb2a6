use super::Rgb;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

// Saturated "anime" palette used by enhanced bursts
const VIVID: [Rgb; 15] = [
    (255, 20, 147),  // Deep pink
    (255, 105, 180), // Hot pink
    (255, 0, 255),   // Magenta
    (138, 43, 226),  // Blue violet
    (0, 191, 255),   // Deep sky blue
    (0, 255, 255),   // Cyan
    (0, 255, 127),   // Spring green
    (127, 255, 0),   // Chartreuse
    (255, 255, 0),   // Yellow
    (255, 215, 0),   // Gold
    (255, 165, 0),   // Orange
    (255, 69, 0),    // Orange red
    (255, 48, 48),   // Firebrick red
    (64, 224, 208),  // Turquoise
    (186, 85, 211),  // Orchid
];

/// Which burst configuration a firework (and its particles) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Standard,
    Enhanced,
}

#[derive(Debug)]
pub enum Palette {
    /// Random hue, full saturation, lightness drawn from the range (0..1).
    Hsl { lightness: Range<f32> },
    Fixed(&'static [Rgb]),
}

/// Every constant that differs between the standard and enhanced bursts.
#[derive(Debug)]
pub struct VariantConfig {
    pub burst_count: Range<usize>,
    /// Each velocity component is uniform in `-spread/2..spread/2`.
    pub speed_spread: f32,
    pub size: Range<f32>,
    pub life: u32,
    pub gravity: f32,
    pub friction: f32,
    pub size_decay: f32,
    pub trail_len: usize,
    pub trail_fade: u32,
    pub glow: f32,
    pub sparkle_glow: f32,
    /// A particle is a sparkle when its roll exceeds this.
    pub sparkle_threshold: Option<f32>,
    pub flicker_chance: f32,
    pub star_share: f32,
    pub rotation_spread: f32,
    pub palette: Palette,
    /// Extra half-size, long-lived sparkle particles appended to every burst.
    pub glitter: usize,
}

pub static STANDARD: VariantConfig = VariantConfig {
    burst_count: 30..50,
    speed_spread: 12.0,
    size: 3.0..9.0,
    life: 120,
    gravity: 0.1,
    friction: 0.98,
    size_decay: 0.97,
    trail_len: 8,
    trail_fade: 10,
    glow: 15.0,
    sparkle_glow: 35.0,
    sparkle_threshold: None,
    flicker_chance: 0.0,
    star_share: 0.0,
    rotation_spread: 0.0,
    palette: Palette::Hsl { lightness: 0.5..0.8 },
    glitter: 0,
};

pub static ENHANCED: VariantConfig = VariantConfig {
    burst_count: 50..80,
    speed_spread: 16.0,
    size: 4.0..12.0,
    life: 150,
    gravity: 0.08,
    friction: 0.98,
    size_decay: 0.985,
    trail_len: 12,
    trail_fade: 15,
    glow: 25.0,
    sparkle_glow: 35.0,
    sparkle_threshold: Some(0.7),
    flicker_chance: 0.3,
    star_share: 0.5,
    rotation_spread: 0.2,
    palette: Palette::Fixed(&VIVID),
    glitter: 20,
};

impl Variant {
    pub fn config(self) -> &'static VariantConfig {
        match self {
            Variant::Standard => &STANDARD,
            Variant::Enhanced => &ENHANCED,
        }
    }
}

impl VariantConfig {
    pub fn roll_color(&self, rng: &mut Rng) -> Rgb {
        match &self.palette {
            Palette::Hsl { lightness } => {
                let l = lightness.start + rng.f32() * (lightness.end - lightness.start);
                hsl_to_rgb(rng.f32() * 360.0, 1.0, l)
            }
            Palette::Fixed(colors) => colors[rng.usize(0..colors.len())],
        }
    }

    pub fn roll_size(&self, rng: &mut Rng) -> f32 {
        self.size.start + rng.f32() * (self.size.end - self.size.start)
    }

    pub fn roll_speed(&self, rng: &mut Rng) -> f32 {
        (rng.f32() - 0.5) * self.speed_spread
    }
}

/// Hue in degrees, saturation and lightness in 0..1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}
