use super::Rgb;
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Star,
}

/// One filled shape the core wants on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub x: f32,
    pub y: f32,
    /// Radius for circles, outer radius for stars.
    pub size: f32,
    pub rotation: f32,
    pub kind: ShapeKind,
    pub color: Rgb,
    pub alpha: f32,
    /// Blur radius of the colored halo, if any.
    pub glow: Option<f32>,
}

/// Drawing capability the show needs from whatever owns the pixels.
pub trait Renderer {
    /// Blend `color` over the whole surface at `alpha` instead of clearing it.
    fn fade(&mut self, color: Rgb, alpha: f32);

    fn fill(&mut self, shape: &Shape);
}

/// Ten vertices of a 5-point star, alternating outer and inner radius.
pub fn star_vertices(x: f32, y: f32, size: f32, rotation: f32) -> [(f32, f32); 10] {
    let inner = size * 0.4;
    let mut vertices = [(0.0, 0.0); 10];
    for (i, vertex) in vertices.iter_mut().enumerate() {
        let radius = if i % 2 == 0 { size } else { inner };
        let angle = rotation + i as f32 * PI / 5.0;
        *vertex = (x + angle.cos() * radius, y + angle.sin() * radius);
    }
    vertices
}
