//! Leaf behaviors: instants fire once per entry, timed leaves interpolate.

use std::f32::consts::PI;

use rand::Rng;
use serde_json::Value as JsonValue;

use super::StepContext;
use crate::action::lookup_animation;
use crate::error::ActionError;
use crate::interval::Interval;
use crate::math::{add, lerp, lerp_f32, scale, BezierPath, Vec3};

/// Leaves that complete on the frame they start.
#[derive(Clone, Debug, PartialEq)]
pub enum InstantLeaf {
    Place(Vec3),
    Hide,
    Show,
    SetFrame { animation: String, index: usize },
    CallFunc { name: String, args: Vec<JsonValue> },
    CallFuncS { name: String, args: Vec<JsonValue> },
}

impl InstantLeaf {
    pub(crate) fn fire(&self, ctx: &mut StepContext<'_>) -> Result<(), ActionError> {
        match self {
            InstantLeaf::Place(position) => ctx.target.set_position(*position),
            InstantLeaf::Hide => ctx.target.set_visible(false),
            InstantLeaf::Show => ctx.target.set_visible(true),
            InstantLeaf::SetFrame { animation, index } => {
                let info = lookup_animation(&*ctx.target, animation)?;
                if *index >= info.frames {
                    return Err(ActionError::FrameOutOfRange {
                        name: animation.clone(),
                        index: *index,
                        frames: info.frames,
                    });
                }
                ctx.target.set_animation(animation);
                ctx.target.set_frame(*index);
            }
            InstantLeaf::CallFunc { name, args } => ctx.callbacks.call(name, args)?,
            InstantLeaf::CallFuncS { name, args } => {
                ctx.callbacks
                    .call_with_target(name, &mut *ctx.target, args)?
            }
        }
        Ok(())
    }
}

/// Leaves driven by an [`Interval`]. Baselines (`start`) are captured on first start.
#[derive(Clone, Debug, PartialEq)]
pub enum TimedLeaf {
    Goto {
        end: Vec3,
        start: Vec3,
    },
    MoveBy {
        delta: Vec3,
        start: Vec3,
    },
    JumpBy {
        delta: Vec3,
        height: f32,
        jumps: u32,
        start: Vec3,
    },
    Bezier {
        path: BezierPath,
        start: Vec3,
    },
    Rotate {
        angle: f32,
        start: f32,
    },
    Scale {
        factor: f32,
        start: f32,
    },
    Blink {
        times: u32,
    },
    FadeIn,
    FadeOut,
    Animate {
        animation: String,
        frames: usize,
    },
    Delay,
    RandomDelay {
        min: f32,
        max: f32,
    },
}

impl TimedLeaf {
    pub(crate) fn goto(end: Vec3) -> Self {
        TimedLeaf::Goto {
            end,
            start: [0.0; 3],
        }
    }

    pub(crate) fn move_by(delta: Vec3) -> Self {
        TimedLeaf::MoveBy {
            delta,
            start: [0.0; 3],
        }
    }

    pub(crate) fn jump_by(delta: Vec3, height: f32, jumps: u32) -> Self {
        TimedLeaf::JumpBy {
            delta,
            height,
            jumps,
            start: [0.0; 3],
        }
    }

    pub(crate) fn bezier(path: BezierPath) -> Self {
        TimedLeaf::Bezier {
            path,
            start: [0.0; 3],
        }
    }

    pub(crate) fn rotate(angle: f32) -> Self {
        TimedLeaf::Rotate { angle, start: 0.0 }
    }

    pub(crate) fn scale(factor: f32) -> Self {
        TimedLeaf::Scale { factor, start: 1.0 }
    }

    pub(crate) fn animate(animation: &str) -> Self {
        TimedLeaf::Animate {
            animation: animation.to_string(),
            frames: 0,
        }
    }

    /// Record the host state relative motion is measured from.
    pub(crate) fn capture(
        &mut self,
        interval: &mut Interval,
        ctx: &mut StepContext<'_>,
    ) -> Result<(), ActionError> {
        match self {
            TimedLeaf::Goto { start, .. }
            | TimedLeaf::MoveBy { start, .. }
            | TimedLeaf::JumpBy { start, .. }
            | TimedLeaf::Bezier { start, .. } => *start = ctx.target.position(),
            TimedLeaf::Rotate { start, .. } => *start = ctx.target.rotation(),
            TimedLeaf::Scale { start, .. } => *start = ctx.target.scale(),
            TimedLeaf::Animate { animation, frames } => {
                let info = lookup_animation(&*ctx.target, animation)?;
                *frames = info.frames;
                interval.duration = info.duration();
                ctx.target.set_animation(animation);
            }
            TimedLeaf::RandomDelay { min, max } => {
                interval.duration = if min < max {
                    ctx.rng.random_range(*min..=*max)
                } else {
                    *min
                };
            }
            TimedLeaf::Blink { .. } | TimedLeaf::FadeIn | TimedLeaf::FadeOut | TimedLeaf::Delay => {}
        }
        Ok(())
    }

    /// Write the interpolated value for the current logical time.
    pub(crate) fn apply(&self, interval: &Interval, runtime: f32, ctx: &mut StepContext<'_>) {
        let t = interval.progress(runtime);
        match self {
            TimedLeaf::Goto { end, start } => ctx.target.set_position(lerp(*start, *end, t)),
            TimedLeaf::MoveBy { delta, start } => {
                ctx.target.set_position(add(*start, scale(*delta, t)))
            }
            TimedLeaf::JumpBy {
                delta,
                height,
                jumps,
                start,
            } => {
                let mut p = add(*start, scale(*delta, t));
                p[1] += height * (t * PI * *jumps as f32).sin().abs();
                ctx.target.set_position(p);
            }
            TimedLeaf::Bezier { path, start } => ctx.target.set_position(add(*start, path.at(t))),
            TimedLeaf::Rotate { angle, start } => ctx.target.set_rotation(start + angle * t),
            TimedLeaf::Scale { factor, start } => {
                ctx.target.set_scale(lerp_f32(*start, start * factor, t))
            }
            TimedLeaf::Blink { times } => {
                if interval.duration > 0.0 {
                    let slice = interval.duration / *times as f32;
                    let m = (t * interval.duration) % slice;
                    ctx.target.set_visible(m > slice / 2.0);
                }
            }
            TimedLeaf::FadeIn => ctx.target.set_opacity(t),
            TimedLeaf::FadeOut => ctx.target.set_opacity(1.0 - t),
            TimedLeaf::Animate { frames, .. } => {
                if *frames > 0 {
                    let frame = ((t * *frames as f32) as usize).min(frames - 1);
                    ctx.target.set_frame(frame);
                }
            }
            TimedLeaf::Delay | TimedLeaf::RandomDelay { .. } => {}
        }
    }
}
