//! Property tweening for the message reveal and the rocket ascent.
//!
//! The show only needs two things from a tween engine: start interpolating
//! some properties of a target, and say when a finite tween has finished.
//! [`Tweener`] is the frame-driven implementation the terminal app uses.

use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::time::Duration;

new_key_type! {
    /// Handle to a running tween, also used as its completion token
    pub struct TweenId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Message(usize),
    Rocket,
    /// Launch prompt shown before the show starts.
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    Scale,
    /// Degrees around the vertical axis.
    RotateY,
    TranslateY,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    InQuad,
    OutQuad,
    InOutSine,
    InBack,
    OutElastic { amplitude: f32, period: f32 },
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::InQuad => t * t,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::InBack => {
                let c1 = 1.70158;
                (c1 + 1.0) * t * t * t - c1 * t * t
            }
            Easing::OutElastic { amplitude, period } => {
                1.0 - elastic_in(1.0 - t, amplitude, period)
            }
        }
    }
}

fn elastic_in(t: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let a = amplitude.clamp(1.0, 10.0);
    let p = period.clamp(0.1, 2.0);
    let s = p / TAU * (1.0 / a).asin();
    -(a * 2f32.powf(10.0 * (t - 1.0)) * (((t - 1.0) - s) * TAU / p).sin())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Normal,
    /// Every odd iteration plays backwards.
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Times(u32),
    Forever,
}

impl Repeat {
    fn iterations(self) -> Option<u32> {
        match self {
            Repeat::Once => Some(1),
            Repeat::Times(n) => Some(n.max(1)),
            Repeat::Forever => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub property: Property,
    pub from: f32,
    pub to: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec {
    pub target: Target,
    pub tracks: Vec<Track>,
    pub duration: Duration,
    pub easing: Easing,
    pub direction: Direction,
    pub repeat: Repeat,
}

impl TweenSpec {
    pub fn new(target: Target, duration: Duration) -> Self {
        Self {
            target,
            tracks: Vec::new(),
            duration,
            easing: Easing::Linear,
            direction: Direction::Normal,
            repeat: Repeat::Once,
        }
    }

    pub fn track(mut self, property: Property, from: f32, to: f32) -> Self {
        self.tracks.push(Track { property, from, to });
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn alternate(mut self) -> Self {
        self.direction = Direction::Alternate;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }
}

/// Scheduler of property interpolation plus a completion signal.
pub trait TweenEngine {
    fn animate(&mut self, spec: TweenSpec) -> TweenId;
}

struct Running {
    spec: TweenSpec,
    elapsed: Duration,
    iteration: u32,
}

impl Running {
    fn progress(&self) -> f32 {
        if self.spec.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.spec.duration.as_secs_f32()).min(1.0)
    }

    fn eased(&self, t: f32) -> f32 {
        let reversed = self.spec.direction == Direction::Alternate && self.iteration % 2 == 1;
        let t = if reversed { 1.0 - t } else { t };
        self.spec.easing.apply(t)
    }
}

/// Frame-driven tween engine.
#[derive(Default)]
pub struct Tweener {
    tweens: SlotMap<TweenId, Running>,
    values: HashMap<(Target, Property), f32>,
}

impl Tweener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every tween and return the ids of those that just finished.
    ///
    /// A finished tween is removed, so its id is reported exactly once.
    pub fn advance(&mut self, dt: Duration) -> Vec<TweenId> {
        let mut finished = Vec::new();

        for (id, tween) in self.tweens.iter_mut() {
            tween.elapsed += dt;
            let duration = tween.spec.duration;
            let iterations = tween.spec.repeat.iterations();

            if duration.is_zero() {
                match iterations {
                    Some(n) => {
                        tween.iteration = n - 1;
                        finished.push(id);
                    }
                    None => tween.elapsed = Duration::ZERO,
                }
            } else {
                while tween.elapsed >= duration {
                    if iterations.is_some_and(|n| tween.iteration + 1 >= n) {
                        tween.elapsed = duration;
                        finished.push(id);
                        break;
                    }
                    tween.elapsed -= duration;
                    tween.iteration += 1;
                }
            }

            let eased = tween.eased(tween.progress());
            for track in &tween.spec.tracks {
                let value = track.from + (track.to - track.from) * eased;
                self.values.insert((tween.spec.target, track.property), value);
            }
        }

        for id in &finished {
            self.tweens.remove(*id);
        }
        finished
    }

    /// Latest value written for a property, if any tween ever touched it.
    pub fn value(&self, target: Target, property: Property) -> Option<f32> {
        self.values.get(&(target, property)).copied()
    }

    #[cfg(test)]
    pub fn is_running(&self, id: TweenId) -> bool {
        self.tweens.contains_key(id)
    }

    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.tweens.len()
    }
}

impl TweenEngine for Tweener {
    fn animate(&mut self, spec: TweenSpec) -> TweenId {
        // Start pose is visible immediately, before the first advance
        for track in &spec.tracks {
            self.values.insert((spec.target, track.property), track.from);
        }
        self.tweens.insert(Running {
            spec,
            elapsed: Duration::ZERO,
            iteration: 0,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_easing_endpoints() {
        let curves = [
            Easing::Linear,
            Easing::InQuad,
            Easing::OutQuad,
            Easing::InOutSine,
            Easing::InBack,
            Easing::OutElastic {
                amplitude: 1.0,
                period: 0.8,
            },
        ];
        for easing in curves {
            assert!(easing.apply(0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_elastic_overshoots() {
        let easing = Easing::OutElastic {
            amplitude: 1.0,
            period: 0.8,
        };
        let peak = (1..100)
            .map(|i| easing.apply(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_in_back_dips_below_zero() {
        assert!(Easing::InBack.apply(0.2) < 0.0);
    }

    #[test]
    fn test_linear_interpolation_and_completion() {
        let mut tweens = Tweener::new();
        let id = tweens.animate(
            TweenSpec::new(Target::Message(0), ms(1000)).track(Property::Opacity, 0.0, 1.0),
        );
        assert_eq!(tweens.value(Target::Message(0), Property::Opacity), Some(0.0));

        assert!(tweens.advance(ms(500)).is_empty());
        let mid = tweens.value(Target::Message(0), Property::Opacity).unwrap_or(-1.0);
        assert!((mid - 0.5).abs() < 1e-4);

        assert_eq!(tweens.advance(ms(600)), vec![id]);
        assert_eq!(tweens.value(Target::Message(0), Property::Opacity), Some(1.0));
        assert!(!tweens.is_running(id));

        // Reported once only
        assert!(tweens.advance(ms(1000)).is_empty());
    }

    #[test]
    fn test_alternate_loops_end_on_odd_pass() {
        let mut tweens = Tweener::new();
        let id = tweens.animate(
            TweenSpec::new(Target::Message(0), ms(100))
                .track(Property::TranslateY, -5.0, 5.0)
                .alternate()
                .repeat(Repeat::Times(3)),
        );

        assert!(tweens.advance(ms(150)).is_empty());
        // Second pass runs backwards: halfway down from 5 to -5
        let value = tweens.value(Target::Message(0), Property::TranslateY).unwrap_or(f32::NAN);
        assert!(value.abs() < 1e-3);

        assert_eq!(tweens.advance(ms(200)), vec![id]);
        assert_eq!(tweens.value(Target::Message(0), Property::TranslateY), Some(5.0));
    }

    #[test]
    fn test_forever_never_completes() {
        let mut tweens = Tweener::new();
        tweens.animate(
            TweenSpec::new(Target::Message(1), ms(300))
                .track(Property::TranslateY, -8.0, 8.0)
                .alternate()
                .repeat(Repeat::Forever),
        );
        for _ in 0..100 {
            assert!(tweens.advance(ms(100)).is_empty());
        }
        assert_eq!(tweens.active(), 1);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut tweens = Tweener::new();
        let id = tweens.animate(TweenSpec::new(Target::Rocket, Duration::ZERO).track(
            Property::TranslateY,
            0.0,
            -10.0,
        ));
        assert_eq!(tweens.advance(Duration::ZERO), vec![id]);
        assert_eq!(tweens.value(Target::Rocket, Property::TranslateY), Some(-10.0));
    }
}
