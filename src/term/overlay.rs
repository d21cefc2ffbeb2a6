use super::canvas::{Canvas, TextRun, lerp_rgb};
use crate::show::Rgb;
use crate::show::render::{Renderer, Shape, ShapeKind};
use crate::show::sequencer::MessageSequencer;
use crate::show::tween::{Easing, Property, Target, TweenSpec, Tweener};
use std::time::Duration;

const ROCKET_COLOR: Rgb = (255, 220, 150);

/// World units of lift that move text by one terminal row.
///
/// Far finer than the pixel scale, so a gentle float still shows.
const LIFT_PER_ROW: f32 = 4.0;

const HINT_DISMISS: Duration = Duration::from_millis(500);

/// Current message as a text run, shaped by its tweened properties.
pub fn message_run(
    sequencer: &MessageSequencer,
    tweens: &Tweener,
    canvas: &Canvas,
    color: Rgb,
    backdrop: Rgb,
) -> Option<TextRun> {
    let stage = sequencer.current_stage()?;
    let text = &sequencer.stages().get(stage)?.text;
    let row = canvas.height() / 4;
    shaped_run(text, Target::Message(stage), tweens, canvas, row, color, backdrop)
}

/// Launch prompt near the bottom edge.
pub fn hint_run(
    text: &str,
    tweens: &Tweener,
    canvas: &Canvas,
    color: Rgb,
    backdrop: Rgb,
) -> Option<TextRun> {
    let row = (canvas.height() / 2).saturating_sub(2);
    shaped_run(text, Target::Hint, tweens, canvas, row, color, backdrop)
}

/// Shrink and fade the launch prompt away.
pub fn hint_dismissal() -> TweenSpec {
    TweenSpec::new(Target::Hint, HINT_DISMISS)
        .track(Property::Scale, 1.0, 0.0)
        .track(Property::Opacity, 1.0, 0.0)
        .easing(Easing::InBack)
}

/// Terminals cannot scale glyphs, so scale and rotation narrow the visible
/// slice of the text around its center instead. Untouched properties read as
/// the resting pose.
fn shaped_run(
    text: &str,
    target: Target,
    tweens: &Tweener,
    canvas: &Canvas,
    row: usize,
    color: Rgb,
    backdrop: Rgb,
) -> Option<TextRun> {
    let value = |property, default| tweens.value(target, property).unwrap_or(default);

    let opacity = value(Property::Opacity, 1.0).clamp(0.0, 1.0);
    if opacity <= 0.01 {
        return None;
    }
    let scale = value(Property::Scale, 1.0).max(0.0);
    let turn = value(Property::RotateY, 0.0).to_radians().cos().max(0.0);
    let lift = value(Property::TranslateY, 0.0);

    let chars: Vec<char> = text.chars().collect();
    let visible =
        ((chars.len() as f32 * (scale * turn).min(1.0)).round() as usize).min(chars.len());
    if visible == 0 {
        return None;
    }
    let skip = (chars.len() - visible) / 2;
    let shown: String = chars[skip..skip + visible].iter().collect();

    let rows = canvas.height() / 2;
    let offset = (lift / LIFT_PER_ROW).round() as i64;
    let row = (row as i64 + offset).clamp(0, rows.saturating_sub(1) as i64) as usize;
    let col = canvas.width().saturating_sub(visible) / 2;

    Some(TextRun {
        row,
        col,
        text: shown,
        color: lerp_rgb(backdrop, color, opacity),
    })
}

/// Rocket head with a short fading tail below it.
pub fn draw_rocket<R: Renderer>(renderer: &mut R, x: f32, y: f32) {
    for i in (1..=4).rev() {
        let fade = 1.0 - i as f32 * 0.2;
        renderer.fill(&Shape {
            x,
            y: y + i as f32 * 6.0,
            size: 2.5 * fade,
            rotation: 0.0,
            kind: ShapeKind::Circle,
            color: ROCKET_COLOR,
            alpha: fade,
            glow: None,
        });
    }
    renderer.fill(&Shape {
        x,
        y,
        size: 3.0,
        rotation: 0.0,
        kind: ShapeKind::Circle,
        color: ROCKET_COLOR,
        alpha: 1.0,
        glow: Some(12.0),
    });
}
