//! Fireworks show core.
//!
//! Particle physics, bursts, the show choreography and the message reveal.
//! Drawing, tweening and frame scheduling are reached through traits so the
//! terminal front end (or a test double) supplies them.

pub mod clock;
pub mod director;
pub mod firework;
pub mod particle;
pub mod render;
pub mod sequencer;
pub mod timers;
pub mod trail;
pub mod tween;
pub mod variant;

pub type Rgb = (u8, u8, u8);

pub const WHITE: Rgb = (255, 255, 255);

/// Width and height of the simulated sky, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
