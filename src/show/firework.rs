use super::particle::Particle;
use super::render::Renderer;
use super::variant::Variant;
use fastrand::Rng;

/// One explosion: every particle is spawned up front and only ever leaves.
#[derive(Debug, Clone)]
pub struct Firework {
    particles: Vec<Particle>,
}

impl Firework {
    pub fn new(x: f32, y: f32, variant: Variant, rng: &mut Rng) -> Self {
        let config = variant.config();
        let count = rng.usize(config.burst_count.clone());

        let mut particles = Vec::with_capacity(count + config.glitter);
        for _ in 0..count {
            particles.push(Particle::spawn(x, y, config, rng));
        }
        for _ in 0..config.glitter {
            particles.push(Particle::spawn(x, y, config, rng).into_glitter());
        }

        Self { particles }
    }

    pub fn update(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn draw<R: Renderer>(&self, renderer: &mut R, rng: &mut Rng) {
        for particle in &self.particles {
            particle.draw(renderer, rng);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::show::render::ShapeKind;
    use crate::show::render::testing::RecordingRenderer;

    #[test]
    fn test_standard_burst_size() {
        let mut rng = Rng::with_seed(1);
        for _ in 0..50 {
            let firework = Firework::new(100.0, 100.0, Variant::Standard, &mut rng);
            assert!((30..50).contains(&firework.particles().len()));
        }
    }

    #[test]
    fn test_enhanced_burst_has_glitter_overlay() {
        let mut rng = Rng::with_seed(2);
        for _ in 0..50 {
            let firework = Firework::new(0.0, 0.0, Variant::Enhanced, &mut rng);
            let total = firework.particles().len();
            assert!((70..100).contains(&total));

            let base = total - 20;
            let (main, glitter) = firework.particles().split_at(base);
            assert!(main.iter().all(|p| p.max_life == 150));
            for speck in glitter {
                assert!(speck.sparkle);
                assert_eq!(speck.max_life, 225);
                assert!(speck.size >= 2.0 && speck.size < 6.0);
            }
        }
    }

    #[test]
    fn test_enhanced_mixes_shapes() {
        let mut rng = Rng::with_seed(3);
        let firework = Firework::new(0.0, 0.0, Variant::Enhanced, &mut rng);
        let stars = firework
            .particles()
            .iter()
            .filter(|p| p.kind == ShapeKind::Star)
            .count();
        assert!(stars > 0 && stars < firework.particles().len());
    }

    #[test]
    fn test_standard_dies_after_max_life() {
        let mut rng = Rng::with_seed(4);
        let mut firework = Firework::new(100.0, 100.0, Variant::Standard, &mut rng);
        let initial = firework.particles().len();

        for _ in 0..119 {
            firework.update();
            assert!(!firework.is_dead());
            assert_eq!(firework.particles().len(), initial);
        }
        firework.update();
        assert!(firework.is_dead());
        assert!(firework.particles().is_empty());
    }

    #[test]
    fn test_enhanced_main_burst_leaves_before_glitter() {
        let mut rng = Rng::with_seed(5);
        let mut firework = Firework::new(0.0, 0.0, Variant::Enhanced, &mut rng);
        for _ in 0..150 {
            firework.update();
        }
        assert_eq!(firework.particles().len(), 20);
        assert!(firework.particles().iter().all(|p| p.sparkle));

        for _ in 150..225 {
            assert!(!firework.is_dead());
            firework.update();
        }
        assert!(firework.is_dead());
    }

    #[test]
    fn test_draw_covers_every_particle() {
        let mut rng = Rng::with_seed(6);
        let firework = Firework::new(10.0, 10.0, Variant::Standard, &mut rng);
        let mut renderer = RecordingRenderer::default();
        firework.draw(&mut renderer, &mut rng);
        // Fresh particles have no trail: body and core each
        assert_eq!(renderer.shapes.len(), firework.particles().len() * 2);
    }
}
