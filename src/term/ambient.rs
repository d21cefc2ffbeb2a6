use crate::show::render::{Renderer, Shape, ShapeKind};
use crate::show::variant::hsl_to_rgb;
use crate::show::{Bounds, Rgb};
use fastrand::Rng;
use noise::{NoiseFn, Perlin};

const MOTES: usize = 20;

struct Mote {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    size: f32,
    color: Rgb,
    alpha: f32,
}

/// Dim drifting dots shown before the show is launched.
pub struct Ambient {
    motes: Vec<Mote>,
    perlin: Perlin,
    bounds: Bounds,
    time: f64,
}

impl Ambient {
    pub fn new(bounds: Bounds, rng: &mut Rng) -> Self {
        let motes = (0..MOTES)
            .map(|_| Mote {
                x: rng.f32() * bounds.width,
                y: rng.f32() * bounds.height,
                vx: (rng.f32() - 0.5) * 0.5,
                vy: (rng.f32() - 0.5) * 0.5,
                size: rng.f32() * 2.0 + 1.0,
                color: hsl_to_rgb(rng.f32() * 360.0, 0.7, 0.8),
                alpha: rng.f32() * 0.5 + 0.2,
            })
            .collect();

        Self {
            motes,
            perlin: Perlin::new(rng.u32(0..1000)),
            bounds,
            time: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.time += 1.0 / 60.0;
        // Wrap time to prevent floating point precision issues
        if self.time > 10000.0 {
            self.time -= 10000.0;
        }

        let (w, h) = (self.bounds.width, self.bounds.height);
        for mote in self.motes.iter_mut() {
            mote.x += mote.vx;
            mote.y += mote.vy;

            if mote.x < 0.0 {
                mote.x = w;
            }
            if mote.x > w {
                mote.x = 0.0;
            }
            if mote.y < 0.0 {
                mote.y = h;
            }
            if mote.y > h {
                mote.y = 0.0;
            }
        }
    }

    /// Clear to the backdrop and draw every mote with a slow twinkle.
    pub fn draw<R: Renderer>(&self, renderer: &mut R, backdrop: Rgb) {
        renderer.fade(backdrop, 1.0);
        for (i, mote) in self.motes.iter().enumerate() {
            let twinkle = self.perlin.get([i as f64 * 7.3, self.time * 0.5]) as f32;
            renderer.fill(&Shape {
                x: mote.x,
                y: mote.y,
                size: mote.size,
                rotation: 0.0,
                kind: ShapeKind::Circle,
                color: mote.color,
                alpha: (mote.alpha * (0.75 + 0.25 * twinkle)).clamp(0.0, 1.0),
                glow: None,
            });
        }
    }

    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }
}
