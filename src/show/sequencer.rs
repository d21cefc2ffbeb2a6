use super::tween::{Easing, Property, Repeat, Target, TweenEngine, TweenId, TweenSpec};
use std::time::Duration;
use tracing::{debug, info, warn};

const ENTRY: Duration = Duration::from_millis(1500);
const EXIT: Duration = Duration::from_millis(1000);
const ENTRY_EASING: Easing = Easing::OutElastic {
    amplitude: 1.0,
    period: 0.8,
};

/// Gentle vertical bob played while a message is on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float {
    pub amplitude: f32,
    pub period: Duration,
    pub repeat: Repeat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    pub text: String,
    /// Swing in from 90 degrees around the vertical axis.
    pub rotate_in: bool,
    pub float: Float,
    /// Time between entry completing and exit starting. Ignored on the last stage.
    pub hold: Duration,
}

impl StageSpec {
    fn entry(&self, target: Target) -> TweenSpec {
        let spec = TweenSpec::new(target, ENTRY)
            .track(Property::Opacity, 0.0, 1.0)
            .track(Property::Scale, 0.5, 1.0)
            .easing(ENTRY_EASING);
        if self.rotate_in {
            spec.track(Property::RotateY, 90.0, 0.0)
        } else {
            spec
        }
    }

    fn float(&self, target: Target, terminal: bool) -> TweenSpec {
        let repeat = if terminal {
            Repeat::Forever
        } else {
            self.float.repeat
        };
        TweenSpec::new(target, self.float.period)
            .track(
                Property::TranslateY,
                -self.float.amplitude,
                self.float.amplitude,
            )
            .easing(Easing::InOutSine)
            .alternate()
            .repeat(repeat)
    }

    fn exit(&self, target: Target) -> TweenSpec {
        TweenSpec::new(target, EXIT)
            .track(Property::Opacity, 1.0, 0.0)
            .track(Property::Scale, 1.0, 0.8)
            .easing(Easing::InQuad)
    }
}

/// Two-stage reveal for the classic show.
pub fn standard_script(texts: &[String]) -> Vec<StageSpec> {
    let floats = [
        (5.0, 2000, Repeat::Times(3), false),
        (8.0, 3000, Repeat::Forever, true),
    ];
    build_script(texts, &floats)
}

/// Three-stage reveal for the anime show.
pub fn enhanced_script(texts: &[String]) -> Vec<StageSpec> {
    let floats = [
        (5.0, 2000, Repeat::Times(3), false),
        (6.0, 2500, Repeat::Times(2), true),
        (8.0, 3000, Repeat::Forever, true),
    ];
    build_script(texts, &floats)
}

fn build_script(texts: &[String], floats: &[(f32, u64, Repeat, bool)]) -> Vec<StageSpec> {
    texts
        .iter()
        .zip(floats)
        .map(|(text, &(amplitude, period, repeat, rotate_in))| StageSpec {
            text: text.clone(),
            rotate_in,
            float: Float {
                amplitude,
                period: Duration::from_millis(period),
                repeat,
            },
            hold: Duration::from_millis(4000),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Pending,
    Entering { stage: usize, tween: TweenId },
    Holding { stage: usize, remaining: Duration },
    Exiting { stage: usize, tween: TweenId },
    /// Last stage floating forever; nothing follows.
    Terminal { stage: usize },
}

/// Strictly linear chain of message stages.
///
/// Stage transitions happen only in [`MessageSequencer::on_tween_complete`]
/// for the one tween the current state is waiting on, so a stray or repeated
/// completion can never skip or replay a stage.
pub struct MessageSequencer {
    stages: Vec<StageSpec>,
    state: SequencerState,
}

impl MessageSequencer {
    pub fn new(stages: Vec<StageSpec>) -> Self {
        Self {
            stages,
            state: SequencerState::Pending,
        }
    }

    pub fn start<T: TweenEngine>(&mut self, tweens: &mut T) -> bool {
        if self.state != SequencerState::Pending {
            warn!(state = ?self.state, "message sequence already started");
            return false;
        }
        if self.stages.is_empty() {
            info!("no messages configured");
            return false;
        }
        self.enter(0, tweens);
        true
    }

    /// Feed a completed tween. Returns whether it moved the sequence.
    pub fn on_tween_complete<T: TweenEngine>(&mut self, id: TweenId, tweens: &mut T) -> bool {
        match self.state {
            SequencerState::Entering { stage, tween } if tween == id => {
                let terminal = stage + 1 == self.stages.len();
                let target = Target::Message(stage);
                tweens.animate(self.stages[stage].float(target, terminal));
                if terminal {
                    info!(stage, "final message floating");
                    self.state = SequencerState::Terminal { stage };
                } else {
                    debug!(stage, hold = ?self.stages[stage].hold, "message holding");
                    self.state = SequencerState::Holding {
                        stage,
                        remaining: self.stages[stage].hold,
                    };
                }
                true
            }
            SequencerState::Exiting { stage, tween } if tween == id => {
                self.enter(stage + 1, tweens);
                true
            }
            _ => {
                debug!(?id, state = ?self.state, "completion not awaited");
                false
            }
        }
    }

    /// Run the hold timer; starts the exit once it elapses.
    pub fn advance<T: TweenEngine>(&mut self, dt: Duration, tweens: &mut T) {
        if let SequencerState::Holding { stage, remaining } = self.state {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                let target = Target::Message(stage);
                let tween = tweens.animate(self.stages[stage].exit(target));
                debug!(stage, "message exiting");
                self.state = SequencerState::Exiting { stage, tween };
            } else {
                self.state = SequencerState::Holding { stage, remaining };
            }
        }
    }

    fn enter<T: TweenEngine>(&mut self, stage: usize, tweens: &mut T) {
        let tween = tweens.animate(self.stages[stage].entry(Target::Message(stage)));
        info!(stage, text = %self.stages[stage].text, "message entering");
        self.state = SequencerState::Entering { stage, tween };
    }

    #[cfg(test)]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Stage currently on screen, if the sequence has started.
    pub fn current_stage(&self) -> Option<usize> {
        match self.state {
            SequencerState::Pending => None,
            SequencerState::Entering { stage, .. }
            | SequencerState::Holding { stage, .. }
            | SequencerState::Exiting { stage, .. }
            | SequencerState::Terminal { stage } => Some(stage),
        }
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }
}
