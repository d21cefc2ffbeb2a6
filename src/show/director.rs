//! Show choreography.
//!
//! The director owns everything a single show touches: the active bursts,
//! the "tick scheduled" flag, pending deferred ignitions, the rocket and the
//! message sequencer. All of it is mutated from the frame loop only.

use super::clock::{AnimationClock, FrameClock};
use super::firework::Firework;
use super::render::Renderer;
use super::sequencer::{MessageSequencer, enhanced_script, standard_script};
use super::timers::TimerQueue;
use super::tween::{Easing, Property, Target, TweenEngine, TweenId, TweenSpec};
use super::variant::Variant;
use super::{Bounds, Rgb};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowStyle {
    /// Eight standard bursts on a steady cadence, two messages.
    Classic,
    /// Rocket ascent, enhanced cluster, mixed wave, three messages.
    Anime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicPlan {
    pub bursts: usize,
    pub spacing_ms: u64,
    pub jitter_ms: u64,
}

impl Default for ClassicPlan {
    fn default() -> Self {
        Self {
            bursts: 8,
            spacing_ms: 300,
            jitter_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimePlan {
    pub rocket_ms: u64,
    pub cluster: usize,
    pub cluster_spacing_ms: u64,
    /// Max offset of cluster bursts from the rocket target, each axis.
    pub cluster_jitter: f32,
    pub wave_delay_ms: u64,
    pub enhanced_bursts: usize,
    pub enhanced_spacing_ms: u64,
    pub standard_bursts: usize,
    pub standard_spacing_ms: u64,
    pub jitter_ms: u64,
}

impl Default for AnimePlan {
    fn default() -> Self {
        Self {
            rocket_ms: 1200,
            cluster: 3,
            cluster_spacing_ms: 200,
            cluster_jitter: 40.0,
            wave_delay_ms: 800,
            enhanced_bursts: 15,
            enhanced_spacing_ms: 400,
            standard_bursts: 8,
            standard_spacing_ms: 700,
            jitter_ms: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowPlan {
    pub style: ShowStyle,
    pub classic: ClassicPlan,
    pub anime: AnimePlan,
    pub backdrop: Rgb,
    /// Alpha of the per-tick backdrop wash that leaves trails behind.
    pub trail_fade: f32,
    pub messages: Vec<String>,
}

impl Default for ShowPlan {
    fn default() -> Self {
        Self {
            style: ShowStyle::Classic,
            classic: ClassicPlan::default(),
            anime: AnimePlan::default(),
            backdrop: (26, 26, 46),
            trail_fade: 0.1,
            messages: Vec::new(),
        }
    }
}

/// A burst waiting to be created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ignition {
    /// Anywhere across the upper sky.
    Random(Variant),
    /// Close to a point, offset up to `jitter` on each axis.
    Near {
        x: f32,
        y: f32,
        jitter: f32,
        variant: Variant,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorState {
    /// No bursts alive, no tick scheduled.
    Idle,
    /// At least one burst alive and a tick scheduled.
    Active,
}

/// Rocket climbing towards the cluster point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rocket {
    pub x: f32,
    pub target_y: f32,
    tween: TweenId,
}

pub struct ShowDirector<C: AnimationClock = FrameClock> {
    plan: ShowPlan,
    bounds: Bounds,
    rng: Rng,
    clock: C,
    bursts: Vec<Firework>,
    running: bool,
    timers: TimerQueue<Ignition>,
    rocket: Option<Rocket>,
    sequencer: MessageSequencer,
    launched: bool,
    finale_started: bool,
    torn_down: bool,
    ignited: usize,
}

impl<C: AnimationClock> ShowDirector<C> {
    pub fn new(plan: ShowPlan, bounds: Bounds, rng: Rng, clock: C) -> Self {
        let stages = match plan.style {
            ShowStyle::Classic => standard_script(&plan.messages),
            ShowStyle::Anime => enhanced_script(&plan.messages),
        };
        Self {
            plan,
            bounds,
            rng,
            clock,
            bursts: Vec::new(),
            running: false,
            timers: TimerQueue::new(),
            rocket: None,
            sequencer: MessageSequencer::new(stages),
            launched: false,
            finale_started: false,
            torn_down: false,
            ignited: 0,
        }
    }

    /// User launch. Only the first trigger of a show does anything.
    pub fn trigger<T: TweenEngine>(&mut self, tweens: &mut T) -> bool {
        if self.torn_down {
            debug!("trigger after teardown ignored");
            return false;
        }
        if self.launched {
            info!("show already launched; trigger ignored");
            return false;
        }
        self.launched = true;
        info!(style = ?self.plan.style, "show launched");

        match self.plan.style {
            ShowStyle::Classic => {
                let plan = self.plan.classic.clone();
                for i in 0..plan.bursts {
                    let delay = i as u64 * plan.spacing_ms + self.jitter(plan.jitter_ms);
                    self.schedule_ignition(
                        Duration::from_millis(delay),
                        Ignition::Random(Variant::Standard),
                    );
                }
            }
            ShowStyle::Anime => self.launch_rocket(tweens),
        }
        true
    }

    fn launch_rocket<T: TweenEngine>(&mut self, tweens: &mut T) {
        let (x, target_y) = self.cluster_point();
        let duration = Duration::from_millis(self.plan.anime.rocket_ms);
        let spec = TweenSpec::new(Target::Rocket, duration)
            .track(Property::TranslateY, self.bounds.height, target_y)
            .easing(Easing::OutQuad);
        let tween = tweens.animate(spec);
        debug!(x, target_y, "rocket launched");
        self.rocket = Some(Rocket { x, target_y, tween });
    }

    /// Rocket reached its apex: cluster over the target, then the wave.
    fn on_rocket_arrived(&mut self, rocket: Rocket) {
        info!("rocket arrived, scheduling cluster and wave");
        let plan = self.plan.anime.clone();

        for i in 0..plan.cluster {
            self.schedule_ignition(
                Duration::from_millis(i as u64 * plan.cluster_spacing_ms),
                Ignition::Near {
                    x: rocket.x,
                    y: rocket.target_y,
                    jitter: plan.cluster_jitter,
                    variant: Variant::Enhanced,
                },
            );
        }

        let waves = [
            (
                plan.enhanced_bursts,
                plan.enhanced_spacing_ms,
                Variant::Enhanced,
            ),
            (
                plan.standard_bursts,
                plan.standard_spacing_ms,
                Variant::Standard,
            ),
        ];
        for (count, spacing, variant) in waves {
            for i in 0..count {
                let delay = plan.wave_delay_ms + i as u64 * spacing + self.jitter(plan.jitter_ms);
                self.schedule_ignition(Duration::from_millis(delay), Ignition::Random(variant));
            }
        }
    }

    pub fn schedule_ignition(&mut self, delay: Duration, ignition: Ignition) {
        self.timers.schedule(delay, ignition);
    }

    /// Create a burst right now.
    pub fn ignite_now(&mut self, x: f32, y: f32, variant: Variant) {
        if self.torn_down {
            debug!(x, y, "ignition after teardown ignored");
            return;
        }
        let firework = Firework::new(x, y, variant, &mut self.rng);
        debug!(
            x,
            y,
            ?variant,
            particles = firework.particles().len(),
            "burst ignited"
        );
        if self.finale_started {
            info!(x, y, "late burst after the finale began");
        }
        self.bursts.push(firework);
        self.ignited += 1;
        self.ensure_running();
    }

    fn ignite(&mut self, ignition: Ignition) {
        let (x, y, variant) = match ignition {
            Ignition::Random(variant) => {
                let x = self.rng.f32() * self.bounds.width;
                let y = self.bounds.height * (0.1 + self.rng.f32() * 0.6);
                (x, y, variant)
            }
            Ignition::Near {
                x,
                y,
                jitter,
                variant,
            } => {
                let dx = (self.rng.f32() - 0.5) * 2.0 * jitter;
                let dy = (self.rng.f32() - 0.5) * 2.0 * jitter;
                (x + dx, y + dy, variant)
            }
        };
        self.ignite_now(x, y, variant);
    }

    /// Schedule the tick loop unless it is already running.
    pub fn ensure_running(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.clock.request_tick();
        info!(bursts = self.bursts.len(), "tick loop started");
    }

    /// Move show time forward: fire due ignitions and run message timers.
    pub fn advance<T: TweenEngine>(&mut self, dt: Duration, tweens: &mut T) {
        for ignition in self.timers.advance(dt) {
            self.ignite(ignition);
        }
        self.sequencer.advance(dt, tweens);
    }

    /// One animation frame. Only meaningful while the loop is running.
    pub fn tick<R: Renderer, T: TweenEngine>(&mut self, renderer: &mut R, tweens: &mut T) {
        if !self.running {
            debug!("tick while idle ignored");
            return;
        }

        renderer.fade(self.plan.backdrop, self.plan.trail_fade);

        for firework in self.bursts.iter_mut() {
            firework.update();
            firework.draw(renderer, &mut self.rng);
        }
        self.bursts.retain(|firework| !firework.is_dead());

        if !self.bursts.is_empty() {
            self.clock.request_tick();
            return;
        }

        self.running = false;
        info!(pending = self.timers.pending(), "tick loop stopped");
        if !self.finale_started {
            self.finale_started = true;
            self.sequencer.start(tweens);
        }
    }

    /// Route a finished tween to the rocket or the message sequence.
    pub fn on_tween_complete<T: TweenEngine>(&mut self, id: TweenId, tweens: &mut T) -> bool {
        match self.rocket {
            Some(rocket) if rocket.tween == id => {
                self.rocket = None;
                self.on_rocket_arrived(rocket);
                true
            }
            _ => self.sequencer.on_tween_complete(id, tweens),
        }
    }

    /// The consuming view is gone; anything still scheduled becomes a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.bursts.clear();
        self.running = false;
        info!(pending = self.timers.pending(), "show torn down");
    }

    /// Only future random origins use the new size.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn cluster_point(&self) -> (f32, f32) {
        (self.bounds.width * 0.5, self.bounds.height * 0.3)
    }

    fn jitter(&mut self, max_ms: u64) -> u64 {
        if max_ms == 0 {
            0
        } else {
            self.rng.u64(0..=max_ms)
        }
    }

    pub fn state(&self) -> DirectorState {
        if self.running {
            DirectorState::Active
        } else {
            DirectorState::Idle
        }
    }

    pub fn is_launched(&self) -> bool {
        self.launched
    }

    pub fn rocket(&self) -> Option<&Rocket> {
        self.rocket.as_ref()
    }

    pub fn sequencer(&self) -> &MessageSequencer {
        &self.sequencer
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
impl<C: AnimationClock> ShowDirector<C> {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn finale_started(&self) -> bool {
        self.finale_started
    }

    pub fn bursts(&self) -> &[Firework] {
        &self.bursts
    }

    /// Bursts created since the show began.
    pub fn ignited(&self) -> usize {
        self.ignited
    }

    pub fn pending_ignitions(&self) -> usize {
        self.timers.pending()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::show::clock::testing::CountingClock;
    use crate::show::render::testing::RecordingRenderer;
    use crate::show::sequencer::SequencerState;
    use crate::show::tween::testing::ManualTweens;

    fn director(style: ShowStyle) -> ShowDirector {
        let plan = ShowPlan {
            style,
            messages: vec!["one".into(), "two".into(), "three".into()],
            ..ShowPlan::default()
        };
        ShowDirector::new(
            plan,
            Bounds::new(800.0, 600.0),
            Rng::with_seed(17),
            FrameClock::new(),
        )
    }

    /// One frame the way the app runs it: timers first, then the tick if requested.
    fn frame(
        director: &mut ShowDirector,
        dt: Duration,
        renderer: &mut RecordingRenderer,
        tweens: &mut ManualTweens,
    ) {
        director.advance(dt, tweens);
        if director.clock_mut().take_request() {
            director.tick(renderer, tweens);
        }
        assert_eq!(director.is_running(), !director.bursts().is_empty());
        assert_eq!(director.is_running(), director.clock().is_requested());
    }

    #[test]
    fn test_starts_idle() {
        let director = director(ShowStyle::Classic);
        assert_eq!(director.state(), DirectorState::Idle);
        assert!(!director.clock().is_requested());
        assert!(director.bursts().is_empty());
    }

    #[test]
    fn test_immediate_burst_runs_until_dead() {
        let mut director = director(ShowStyle::Classic);
        let mut renderer = RecordingRenderer::default();
        let mut tweens = ManualTweens::default();

        director.ignite_now(100.0, 100.0, Variant::Standard);
        assert_eq!(director.state(), DirectorState::Active);

        for _ in 0..119 {
            frame(&mut director, Duration::ZERO, &mut renderer, &mut tweens);
            assert!(director.is_running());
        }
        frame(&mut director, Duration::ZERO, &mut renderer, &mut tweens);
        assert_eq!(director.state(), DirectorState::Idle);
        assert!(director.finale_started());
        assert!(matches!(
            director.sequencer().state(),
            SequencerState::Entering { stage: 0, .. }
        ));

        // Every tick washes the backdrop instead of clearing
        assert_eq!(renderer.fades.len(), 120);
        assert!(
            renderer
                .fades
                .iter()
                .all(|&(color, alpha)| color == (26, 26, 46) && alpha == 0.1)
        );
    }

    #[test]
    fn test_ensure_running_is_idempotent() {
        let mut director = ShowDirector::new(
            ShowPlan::default(),
            Bounds::new(800.0, 600.0),
            Rng::with_seed(17),
            CountingClock::default(),
        );
        director.ignite_now(10.0, 10.0, Variant::Standard);
        director.ignite_now(20.0, 20.0, Variant::Enhanced);
        director.ensure_running();
        assert_eq!(director.clock().requests, 1);
    }

    #[test]
    fn test_classic_staggered_show() {
        let mut director = director(ShowStyle::Classic);
        let mut renderer = RecordingRenderer::default();
        let mut tweens = ManualTweens::default();
        let dt = Duration::from_millis(50);

        assert!(director.trigger(&mut tweens));
        assert_eq!(director.pending_ignitions(), 8);
        frame(&mut director, Duration::ZERO, &mut renderer, &mut tweens);
        assert_eq!(director.ignited(), 1);

        let mut stopped_at = None;
        for _ in 0..400 {
            frame(&mut director, dt, &mut renderer, &mut tweens);
            let now = director.now().as_millis();
            if now == 2050 {
                assert_eq!(director.ignited(), 7);
            }
            if now == 2100 {
                assert_eq!(director.ignited(), 8);
                assert_eq!(director.bursts().len(), 8);
            }
            if !director.is_running() && stopped_at.is_none() && director.ignited() == 8 {
                stopped_at = Some(now);
            }
        }

        // The last burst ignites at 2100ms and lives 120 frames
        assert_eq!(stopped_at, Some(2100 + 119 * 50));
        assert!(director.bursts().is_empty());
        assert!(director.finale_started());
    }

    #[test]
    fn test_second_trigger_is_ignored() {
        let mut director = director(ShowStyle::Classic);
        let mut tweens = ManualTweens::default();
        assert!(director.trigger(&mut tweens));
        assert!(!director.trigger(&mut tweens));
        assert_eq!(director.pending_ignitions(), 8);
    }

    #[test]
    fn test_anime_rocket_then_cluster_and_wave() {
        let mut director = director(ShowStyle::Anime);
        let mut renderer = RecordingRenderer::default();
        let mut tweens = ManualTweens::default();

        assert!(director.trigger(&mut tweens));
        let rocket = *director.rocket().expect("rocket in flight");
        assert!((rocket.x - 400.0).abs() < 1e-3);
        assert!((rocket.target_y - 180.0).abs() < 1e-3);
        assert_eq!(director.pending_ignitions(), 0);

        // Nothing bursts until the ascent completes
        frame(&mut director, Duration::from_secs(5), &mut renderer, &mut tweens);
        assert_eq!(director.ignited(), 0);
        assert_eq!(director.state(), DirectorState::Idle);

        let (id, spec) = tweens.last().cloned().expect("rocket tween");
        assert_eq!(spec.target, Target::Rocket);
        assert!(director.on_tween_complete(id, &mut tweens));
        assert!(director.rocket().is_none());
        assert_eq!(director.pending_ignitions(), 3 + 15 + 8);

        frame(&mut director, Duration::ZERO, &mut renderer, &mut tweens);
        assert_eq!(director.ignited(), 1);
        let first = &director.bursts()[0];
        // Enhanced bursts carry at least 50 particles plus 20 glitter specks
        assert!(first.particles().len() >= 70);
        // The first trail point is where the burst was ignited
        let origin = first.particles()[0].trail().iter().next().copied().expect("trail point");
        assert!((origin.x - 400.0).abs() <= 40.01 && (origin.y - 180.0).abs() <= 40.01);

        for _ in 0..60 {
            frame(&mut director, Duration::from_millis(200), &mut renderer, &mut tweens);
        }
        assert_eq!(director.ignited(), 26);
        assert_eq!(director.pending_ignitions(), 0);

        // A second completion of the same rocket tween is not a second wave
        assert!(!director.on_tween_complete(id, &mut tweens));
        assert_eq!(director.pending_ignitions(), 0);
    }

    #[test]
    fn test_late_burst_restarts_loop_without_second_finale() {
        let mut director = director(ShowStyle::Classic);
        let mut renderer = RecordingRenderer::default();
        let mut tweens = ManualTweens::default();

        director.ignite_now(50.0, 50.0, Variant::Standard);
        for _ in 0..120 {
            frame(&mut director, Duration::ZERO, &mut renderer, &mut tweens);
        }
        assert!(director.finale_started());
        let started = tweens.started.len();

        director.schedule_ignition(Duration::from_millis(100), Ignition::Random(Variant::Standard));
        frame(&mut director, Duration::from_millis(100), &mut renderer, &mut tweens);
        assert!(director.is_running());

        for _ in 0..120 {
            frame(&mut director, Duration::ZERO, &mut renderer, &mut tweens);
        }
        assert!(!director.is_running());
        assert_eq!(tweens.started.len(), started);
    }

    #[test]
    fn test_ignition_after_teardown_is_noop() {
        let mut director = director(ShowStyle::Classic);
        let mut renderer = RecordingRenderer::default();
        let mut tweens = ManualTweens::default();

        director.trigger(&mut tweens);
        director.teardown();
        frame(&mut director, Duration::from_secs(10), &mut renderer, &mut tweens);
        assert_eq!(director.ignited(), 0);
        assert!(!director.is_running());
        assert!(!director.trigger(&mut tweens));
    }

    #[test]
    fn test_random_origins_stay_in_upper_sky() {
        let mut director = director(ShowStyle::Classic);
        for _ in 0..50 {
            director.ignite(Ignition::Random(Variant::Standard));
        }
        for burst in director.bursts() {
            let origin = &burst.particles()[0];
            assert!(origin.x >= 0.0 && origin.x < 800.0);
            assert!(origin.y >= 60.0 && origin.y < 420.0);
        }
    }

    #[test]
    fn test_idle_tick_draws_nothing() {
        let mut director = director(ShowStyle::Classic);
        let mut renderer = RecordingRenderer::default();
        let mut tweens = ManualTweens::default();
        director.tick(&mut renderer, &mut tweens);
        assert!(renderer.fades.is_empty());
        assert!(!director.finale_started());
    }
}
