use super::ambient::Ambient;
use super::canvas::{Canvas, TextRun, lerp_rgb};
use super::overlay::{draw_rocket, hint_dismissal, hint_run, message_run};
use crate::show::Rgb;
use crate::show::clock::FrameClock;
use crate::show::director::{DirectorState, ShowDirector, ShowPlan};
use crate::show::render::Renderer;
use crate::show::tween::{Property, Target, TweenEngine, TweenId, Tweener};
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use fastrand::Rng;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

const HINT: &str = "press space or click to launch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hint {
    Shown,
    Dismissing(TweenId),
    Gone,
}

/// Terminal front end: owns the canvas and drives the show from frames and input.
pub struct FireshowApp {
    canvas: Canvas,
    director: ShowDirector<FrameClock>,
    tweens: Tweener,
    ambient: Ambient,
    hint: Hint,
    backdrop: Rgb,
    message_color: Rgb,
    trail_fade: f32,
    scale: f32,
}

impl FireshowApp {
    pub fn new(
        cols: usize,
        rows: usize,
        scale: f32,
        plan: ShowPlan,
        message_color: Rgb,
        mut rng: Rng,
    ) -> Self {
        let backdrop = plan.backdrop;
        let trail_fade = plan.trail_fade;
        let canvas = Canvas::new(cols, rows, scale, backdrop);
        let bounds = canvas.bounds();
        let ambient = Ambient::new(bounds, &mut rng);

        Self {
            director: ShowDirector::new(plan, bounds, rng, FrameClock::new()),
            canvas,
            tweens: Tweener::new(),
            ambient,
            hint: Hint::Shown,
            backdrop,
            message_color,
            trail_fade,
            scale,
        }
    }

    pub fn update(&mut self, dt: f32) {
        let dt = Duration::from_secs_f32(dt);

        // Timers see this frame before any completion can start a new hold
        self.director.advance(dt, &mut self.tweens);
        for id in self.tweens.advance(dt) {
            if self.hint == Hint::Dismissing(id) {
                self.hint = Hint::Gone;
                continue;
            }
            self.director.on_tween_complete(id, &mut self.tweens);
        }

        if !self.director.is_launched() {
            self.ambient.update();
            self.ambient.draw(&mut self.canvas, self.backdrop);
        } else if self.director.state() == DirectorState::Idle {
            // Let leftovers and the rocket trail settle into the backdrop
            self.canvas.fade(self.backdrop, self.trail_fade);
        }

        if let Some(rocket) = self.director.rocket().copied() {
            if let Some(y) = self.tweens.value(Target::Rocket, Property::TranslateY) {
                draw_rocket(&mut self.canvas, rocket.x, y);
            }
        }

        if self.director.clock_mut().take_request() {
            self.director.tick(&mut self.canvas, &mut self.tweens);
        }
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let mut text: Vec<TextRun> = Vec::new();
        if self.hint != Hint::Gone {
            text.extend(hint_run(
                HINT,
                &self.tweens,
                &self.canvas,
                lerp_rgb(self.backdrop, self.message_color, 0.5),
                self.backdrop,
            ));
        }
        text.extend(message_run(
            self.director.sequencer(),
            &self.tweens,
            &self.canvas,
            self.message_color,
            self.backdrop,
        ));
        self.canvas.render(out, &text)
    }

    pub fn handle_event(&mut self, event: &Event) {
        let launch = match event {
            Event::Key(key) => {
                key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter)
            }
            Event::Mouse(mouse) => mouse.kind == MouseEventKind::Down(MouseButton::Left),
            _ => false,
        };
        if launch && self.director.trigger(&mut self.tweens) {
            debug!("launch requested from input");
            self.hint = Hint::Dismissing(self.tweens.animate(hint_dismissal()));
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.canvas = Canvas::new(cols, rows, self.scale, self.backdrop);
        let bounds = self.canvas.bounds();
        self.director.resize(bounds);
        self.ambient.resize(bounds);
        info!(cols, rows, "terminal resized");
    }

    pub fn shutdown(&mut self) {
        self.director.teardown();
    }

    #[cfg(test)]
    pub fn director(&self) -> &ShowDirector<FrameClock> {
        &self.director
    }
}
