use super::render::{Renderer, Shape, ShapeKind};
use super::trail::Trail;
use super::variant::VariantConfig;
use super::{Rgb, WHITE};
use fastrand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub color: Rgb,
    pub life: u32,
    pub max_life: u32,
    pub gravity: f32,
    pub friction: f32,
    pub kind: ShapeKind,
    pub sparkle: bool,
    pub rotation: f32,
    pub rotation_speed: f32,
    trail: Trail,
    config: &'static VariantConfig,
}

impl Particle {
    /// Roll a fresh particle at the burst origin.
    pub fn spawn(x: f32, y: f32, config: &'static VariantConfig, rng: &mut Rng) -> Self {
        let vx = config.roll_speed(rng);
        let vy = config.roll_speed(rng);
        let size = config.roll_size(rng);
        let color = config.roll_color(rng);
        let kind = if rng.f32() < config.star_share {
            ShapeKind::Star
        } else {
            ShapeKind::Circle
        };
        let sparkle = config
            .sparkle_threshold
            .is_some_and(|threshold| rng.f32() > threshold);
        let (rotation, rotation_speed) = if config.rotation_spread > 0.0 {
            (rng.f32() * TAU, (rng.f32() - 0.5) * config.rotation_spread)
        } else {
            (0.0, 0.0)
        };

        Self {
            x,
            y,
            vx,
            vy,
            size,
            color,
            life: config.life,
            max_life: config.life,
            gravity: config.gravity,
            friction: config.friction,
            kind,
            sparkle,
            rotation,
            rotation_speed,
            trail: Trail::new(config.trail_len, config.trail_fade),
            config,
        }
    }

    /// Turn a freshly spawned particle into a glitter speck: half size,
    /// half again as long-lived, always sparkling.
    pub fn into_glitter(mut self) -> Self {
        self.size *= 0.5;
        self.max_life = self.max_life * 3 / 2;
        self.life = self.max_life;
        self.sparkle = true;
        self
    }

    pub fn update(&mut self) {
        self.trail.record(self.x, self.y, self.size);

        self.vx *= self.friction;
        self.vy *= self.friction;
        self.vy += self.gravity;

        self.x += self.vx;
        self.y += self.vy;

        self.life = self.life.saturating_sub(1);
        self.size *= self.config.size_decay;
        self.rotation += self.rotation_speed;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Normalized remaining life, 1.0 at spawn and 0.0 when spent.
    pub fn fade(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }

    #[cfg(test)]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn draw<R: Renderer>(&self, renderer: &mut R, rng: &mut Rng) {
        let fade = self.fade();

        for point in self.trail.iter() {
            let strength = self.trail.strength(point);
            renderer.fill(&Shape {
                x: point.x,
                y: point.y,
                size: point.size * strength * 0.5,
                rotation: self.rotation,
                kind: self.kind,
                color: self.color,
                alpha: strength * fade * 0.5,
                glow: None,
            });
        }

        let glow = if self.sparkle && rng.f32() < self.config.flicker_chance {
            self.config.sparkle_glow
        } else {
            self.config.glow
        };
        renderer.fill(&Shape {
            x: self.x,
            y: self.y,
            size: self.size,
            rotation: self.rotation,
            kind: self.kind,
            color: self.color,
            alpha: fade,
            glow: Some(glow),
        });

        // White core gives the body its hot center
        renderer.fill(&Shape {
            x: self.x,
            y: self.y,
            size: self.size * 0.4,
            rotation: self.rotation,
            kind: self.kind,
            color: WHITE,
            alpha: fade,
            glow: None,
        });
    }
}
