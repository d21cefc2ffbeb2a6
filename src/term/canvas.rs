use crate::show::render::{Renderer, Shape, ShapeKind, star_vertices};
use crate::show::{Bounds, Rgb};
use std::f32::consts::PI;
use std::io::Write;

/// Text drawn over the pixels, one character per terminal cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub row: usize,
    pub col: usize,
    pub text: String,
    pub color: Rgb,
}

/// Float RGB framebuffer rendered as half-block cells, two pixels per cell.
///
/// Shapes arrive in world units; `scale` world units map to one pixel.
pub struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    pixels: Vec<[f32; 3]>,
    output_buf: Vec<u8>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, scale: f32, background: Rgb) -> Self {
        let width = cols.max(1);
        let height = rows.max(1) * 2;
        Self {
            width,
            height,
            scale,
            pixels: vec![to_float(background); width * height],
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    /// Size of the canvas in world units.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.width as f32 * self.scale,
            self.height as f32 * self.scale,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(to_rgb(self.pixels[y * self.width + x]))
        } else {
            None
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height || alpha <= 0.0
        {
            return;
        }
        let alpha = alpha.min(1.0);
        let pixel = &mut self.pixels[y as usize * self.width + x as usize];
        for (channel, source) in pixel.iter_mut().zip(color) {
            *channel = *channel * (1.0 - alpha) + source * alpha;
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3], alpha: f32) {
        // Sub-pixel dots still show up, dimmed by their coverage
        if radius < 0.5 {
            let coverage = (PI * radius * radius).min(1.0);
            self.blend(cx.floor() as i32, cy.floor() as i32, color, alpha * coverage);
            return;
        }
        let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
        let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn fill_star(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        rotation: f32,
        color: [f32; 3],
        alpha: f32,
    ) {
        if radius < 1.0 {
            self.fill_circle(cx, cy, radius * 0.7, color, alpha);
            return;
        }
        let vertices = star_vertices(cx, cy, radius, rotation);
        let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
        let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if point_in_polygon(x as f32 + 0.5, y as f32 + 0.5, &vertices) {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn fill_glow(&mut self, cx: f32, cy: f32, radius: f32, blur: f32, color: [f32; 3], alpha: f32) {
        let outer = radius + blur;
        let (x0, x1) = ((cx - outer).floor() as i32, (cx + outer).ceil() as i32);
        let (y0, y1) = ((cy - outer).floor() as i32, (cy + outer).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d > radius && d < outer {
                    let falloff = 1.0 - (d - radius) / blur;
                    self.blend(x, y, color, alpha * 0.35 * falloff * falloff);
                }
            }
        }
    }

    pub fn render<W: Write>(&mut self, out: &mut W, text: &[TextRun]) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let rows = self.height / 2;
        let mut overlay: Vec<Option<(char, Rgb)>> = vec![None; self.width * rows];
        for run in text {
            if run.row >= rows {
                continue;
            }
            for (i, ch) in run.text.chars().enumerate() {
                let col = run.col + i;
                if col < self.width {
                    overlay[run.row * self.width + col] = Some((ch, run.color));
                }
            }
        }

        let mut prev_bg: Option<Rgb> = None;
        let mut prev_fg: Option<Rgb> = None;

        for row in 0..rows {
            for x in 0..self.width {
                let top = to_rgb(self.pixels[row * 2 * self.width + x]);
                let bottom = to_rgb(self.pixels[(row * 2 + 1) * self.width + x]);

                let (bg, fg, glyph) = match overlay[row * self.width + x] {
                    Some((ch, color)) => (mix(top, bottom), color, ch),
                    None => (top, bottom, '▄'),
                };

                if prev_bg != Some(bg) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                    prev_bg = Some(bg);
                }
                if prev_fg != Some(fg) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    prev_fg = Some(fg);
                }

                let mut utf8 = [0u8; 4];
                self.output_buf
                    .extend_from_slice(glyph.encode_utf8(&mut utf8).as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_bg = None;
            prev_fg = None;
            if row + 1 < rows {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()?;
        Ok(())
    }
}

impl Renderer for Canvas {
    fn fade(&mut self, color: Rgb, alpha: f32) {
        let color = to_float(color);
        let alpha = alpha.clamp(0.0, 1.0);
        for pixel in self.pixels.iter_mut() {
            for (channel, target) in pixel.iter_mut().zip(color) {
                *channel += (target - *channel) * alpha;
            }
        }
    }

    fn fill(&mut self, shape: &Shape) {
        let cx = shape.x / self.scale;
        let cy = shape.y / self.scale;
        let radius = shape.size.max(0.0) / self.scale;
        let color = to_float(shape.color);

        if let Some(blur) = shape.glow {
            let blur = blur / self.scale;
            if blur > 0.0 {
                self.fill_glow(cx, cy, radius, blur, color, shape.alpha);
            }
        }

        match shape.kind {
            ShapeKind::Circle => self.fill_circle(cx, cy, radius, color, shape.alpha),
            ShapeKind::Star => self.fill_star(cx, cy, radius, shape.rotation, color, shape.alpha),
        }
    }
}

fn point_in_polygon(x: f32, y: f32, vertices: &[(f32, f32)]) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn to_float(color: Rgb) -> [f32; 3] {
    [color.0 as f32, color.1 as f32, color.2 as f32]
}

fn to_rgb(pixel: [f32; 3]) -> Rgb {
    let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    (channel(pixel[0]), channel(pixel[1]), channel(pixel[2]))
}

fn mix(a: Rgb, b: Rgb) -> Rgb {
    (
        ((a.0 as u16 + b.0 as u16) / 2) as u8,
        ((a.1 as u16 + b.1 as u16) / 2) as u8,
        ((a.2 as u16 + b.2 as u16) / 2) as u8,
    )
}

/// Linear blend from `a` to `b`.
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    (channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}
