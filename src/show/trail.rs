use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    /// Ticks left before this point is dropped.
    pub fade: u32,
    /// Particle size when the point was captured.
    pub size: f32,
}

/// Bounded history of recent particle positions, oldest first.
///
/// Each point fades on its own counter, so a trail can shrink below its
/// capacity while the particle slows down.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
    capacity: usize,
    fade: u32,
}

impl Trail {
    pub fn new(capacity: usize, fade: u32) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
            fade,
        }
    }

    /// Push, truncate to capacity, then age every point by one tick.
    pub fn record(&mut self, x: f32, y: f32, size: f32) {
        self.points.push_back(TrailPoint {
            x,
            y,
            fade: self.fade,
            size,
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }

        for point in self.points.iter_mut() {
            point.fade = point.fade.saturating_sub(1);
        }
        self.points.retain(|point| point.fade > 0);
    }

    /// Fraction of the fade counter left on a point (1.0 when fresh).
    pub fn strength(&self, point: &TrailPoint) -> f32 {
        point.fade as f32 / self.fade as f32
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_never_exceeds_capacity() {
        let mut trail = Trail::new(8, 10);
        for i in 0..100 {
            trail.record(i as f32, 0.0, 1.0);
            assert!(trail.len() <= 8);
        }
        assert_eq!(trail.len(), 8);
    }

    #[test]
    fn test_oldest_points_drop_first() {
        let mut trail = Trail::new(3, 100);
        for i in 0..5 {
            trail.record(i as f32, 0.0, 1.0);
        }
        let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_points_fade_each_tick() {
        let mut trail = Trail::new(12, 15);
        trail.record(0.0, 0.0, 4.0);
        assert_eq!(trail.iter().next().map(|p| p.fade), Some(14));
        trail.record(1.0, 0.0, 3.0);
        let fades: Vec<u32> = trail.iter().map(|p| p.fade).collect();
        assert_eq!(fades, vec![13, 14]);
        let sizes: Vec<f32> = trail.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![4.0, 3.0]);
    }

    #[test]
    fn test_expired_points_are_purged() {
        // Fade shorter than capacity: the trail is bounded by fade instead
        let mut trail = Trail::new(12, 3);
        for i in 0..10 {
            trail.record(i as f32, 0.0, 1.0);
        }
        assert_eq!(trail.len(), 2);
        assert!(trail.iter().all(|p| p.fade > 0));
    }
}
