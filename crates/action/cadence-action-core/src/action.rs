//! Action templates: parameter-only, reusable descriptions of a behavior.
//!
//! A template never holds runtime state. `Host::do_action` builds a fresh
//! [`Instance`](crate::instance::Instance) from it, so one template can be
//! issued to any number of hosts at once without the runs interfering.

use std::ops::{Add, BitOr};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::callbacks::Callbacks;
use crate::error::ActionError;
use crate::interval::{Direction, Mode, Timing};
use crate::math::{is_finite, BezierPath, Vec3};
use crate::target::Target;

/// How many times a `Repeat` runs its child.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatCount {
    Times(u32),
    /// Never completes.
    Forever,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    // ----- instant leaves -----
    Place {
        position: Vec3,
    },
    Hide,
    Show,
    /// Select `animation` and show frame `index` of it.
    SetFrame {
        animation: String,
        index: usize,
    },
    CallFunc {
        name: String,
        #[serde(default)]
        args: Vec<JsonValue>,
    },
    /// Like `CallFunc`, but the callback also receives the target.
    #[serde(rename = "call_func_s")]
    CallFuncS {
        name: String,
        #[serde(default)]
        args: Vec<JsonValue>,
    },

    // ----- interval leaves -----
    /// Move to an absolute position.
    Goto {
        position: Vec3,
        timing: Timing,
    },
    MoveBy {
        delta: Vec3,
        timing: Timing,
    },
    JumpBy {
        delta: Vec3,
        height: f32,
        jumps: u32,
        timing: Timing,
    },
    Bezier {
        path: BezierPath,
        timing: Timing,
    },
    /// Rotate by `angle` degrees.
    Rotate {
        angle: f32,
        timing: Timing,
    },
    /// Multiply the scale by `factor`.
    Scale {
        factor: f32,
        timing: Timing,
    },
    Blink {
        times: u32,
        timing: Timing,
    },
    FadeIn {
        timing: Timing,
    },
    FadeOut {
        timing: Timing,
    },
    /// Play a named animation once; the duration comes from the target's lookup.
    Animate {
        animation: String,
        #[serde(default)]
        direction: Direction,
        #[serde(default)]
        mode: Mode,
    },
    Delay {
        timing: Timing,
    },
    /// Wait a duration drawn uniformly from `[min, max]` at first start.
    RandomDelay {
        min: f32,
        max: f32,
    },

    // ----- composites -----
    Sequence {
        actions: Vec<Action>,
        #[serde(default)]
        direction: Direction,
        #[serde(default)]
        mode: Mode,
    },
    Repeat {
        action: Box<Action>,
        times: RepeatCount,
    },
    Spawn {
        actions: Vec<Action>,
    },
}

impl Action {
    pub fn place(position: Vec3) -> Self {
        Action::Place { position }
    }

    pub fn hide() -> Self {
        Action::Hide
    }

    pub fn show() -> Self {
        Action::Show
    }

    pub fn set_frame(animation: &str, index: usize) -> Self {
        Action::SetFrame {
            animation: animation.to_string(),
            index,
        }
    }

    pub fn call_func(name: &str, args: Vec<JsonValue>) -> Self {
        Action::CallFunc {
            name: name.to_string(),
            args,
        }
    }

    pub fn call_func_s(name: &str, args: Vec<JsonValue>) -> Self {
        Action::CallFuncS {
            name: name.to_string(),
            args,
        }
    }

    pub fn goto(position: Vec3, duration: f32) -> Self {
        Action::Goto {
            position,
            timing: Timing::new(duration),
        }
    }

    pub fn move_by(delta: Vec3, duration: f32) -> Self {
        Action::MoveBy {
            delta,
            timing: Timing::new(duration),
        }
    }

    pub fn jump_by(delta: Vec3, height: f32, jumps: u32, duration: f32) -> Self {
        Action::JumpBy {
            delta,
            height,
            jumps,
            timing: Timing::new(duration),
        }
    }

    pub fn bezier(path: BezierPath, duration: f32) -> Self {
        Action::Bezier {
            path,
            timing: Timing::new(duration),
        }
    }

    pub fn rotate(angle: f32, duration: f32) -> Self {
        Action::Rotate {
            angle,
            timing: Timing::new(duration),
        }
    }

    pub fn scale(factor: f32, duration: f32) -> Self {
        Action::Scale {
            factor,
            timing: Timing::new(duration),
        }
    }

    pub fn blink(times: u32, duration: f32) -> Self {
        Action::Blink {
            times,
            timing: Timing::new(duration),
        }
    }

    pub fn fade_in(duration: f32) -> Self {
        Action::FadeIn {
            timing: Timing::new(duration),
        }
    }

    pub fn fade_out(duration: f32) -> Self {
        Action::FadeOut {
            timing: Timing::new(duration),
        }
    }

    pub fn animate(animation: &str) -> Self {
        Action::Animate {
            animation: animation.to_string(),
            direction: Direction::Forward,
            mode: Mode::Repeat,
        }
    }

    pub fn delay(duration: f32) -> Self {
        Action::Delay {
            timing: Timing::new(duration),
        }
    }

    pub fn random_delay(min: f32, max: f32) -> Self {
        Action::RandomDelay { min, max }
    }

    pub fn sequence(actions: Vec<Action>) -> Self {
        Action::Sequence {
            actions,
            direction: Direction::Forward,
            mode: Mode::Repeat,
        }
    }

    pub fn spawn(actions: Vec<Action>) -> Self {
        Action::Spawn { actions }
    }

    pub fn repeat(self, times: u32) -> Self {
        Action::Repeat {
            action: Box::new(self),
            times: RepeatCount::Times(times),
        }
    }

    pub fn repeat_forever(self) -> Self {
        Action::Repeat {
            action: Box::new(self),
            times: RepeatCount::Forever,
        }
    }

    /// Flip direction on every restart. No effect on instants, Repeat or Spawn.
    pub fn ping_pong(self) -> Self {
        self.with_mode(Mode::PingPong)
    }

    /// Start running backward. No effect on instants, Repeat or Spawn.
    pub fn reversed(mut self) -> Self {
        if let Some(direction) = self.direction_mut() {
            *direction = direction.flipped();
        }
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        if let Some(m) = self.mode_mut() {
            *m = mode;
        }
        self
    }

    fn direction_mut(&mut self) -> Option<&mut Direction> {
        match self {
            Action::Animate { direction, .. } | Action::Sequence { direction, .. } => {
                Some(direction)
            }
            _ => self.timing_mut().map(|t| &mut t.direction),
        }
    }

    fn mode_mut(&mut self) -> Option<&mut Mode> {
        match self {
            Action::Animate { mode, .. } | Action::Sequence { mode, .. } => Some(mode),
            _ => self.timing_mut().map(|t| &mut t.mode),
        }
    }

    fn timing_mut(&mut self) -> Option<&mut Timing> {
        match self {
            Action::Goto { timing, .. }
            | Action::MoveBy { timing, .. }
            | Action::JumpBy { timing, .. }
            | Action::Bezier { timing, .. }
            | Action::Rotate { timing, .. }
            | Action::Scale { timing, .. }
            | Action::Blink { timing, .. }
            | Action::FadeIn { timing }
            | Action::FadeOut { timing }
            | Action::Delay { timing } => Some(timing),
            _ => None,
        }
    }

    /// Short snake_case name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Place { .. } => "place",
            Action::Hide => "hide",
            Action::Show => "show",
            Action::SetFrame { .. } => "set_frame",
            Action::CallFunc { .. } => "call_func",
            Action::CallFuncS { .. } => "call_func_s",
            Action::Goto { .. } => "goto",
            Action::MoveBy { .. } => "move_by",
            Action::JumpBy { .. } => "jump_by",
            Action::Bezier { .. } => "bezier",
            Action::Rotate { .. } => "rotate",
            Action::Scale { .. } => "scale",
            Action::Blink { .. } => "blink",
            Action::FadeIn { .. } => "fade_in",
            Action::FadeOut { .. } => "fade_out",
            Action::Animate { .. } => "animate",
            Action::Delay { .. } => "delay",
            Action::RandomDelay { .. } => "random_delay",
            Action::Sequence { .. } => "sequence",
            Action::Repeat { .. } => "repeat",
            Action::Spawn { .. } => "spawn",
        }
    }

    /// Nominal duration in seconds when it is known from parameters alone.
    ///
    /// Instants and Spawn report 0. `None` for `Animate`, `RandomDelay` and
    /// anything that repeats forever.
    pub fn nominal_duration(&self) -> Option<f32> {
        match self {
            Action::Place { .. }
            | Action::Hide
            | Action::Show
            | Action::SetFrame { .. }
            | Action::CallFunc { .. }
            | Action::CallFuncS { .. }
            | Action::Spawn { .. } => Some(0.0),
            Action::Animate { .. } | Action::RandomDelay { .. } => None,
            Action::Sequence { actions, .. } => actions
                .iter()
                .try_fold(0.0, |acc, a| a.nominal_duration().map(|d| acc + d)),
            Action::Repeat { action, times } => match times {
                RepeatCount::Times(n) => action.nominal_duration().map(|d| d * *n as f32),
                RepeatCount::Forever => None,
            },
            Action::Goto { timing, .. }
            | Action::MoveBy { timing, .. }
            | Action::JumpBy { timing, .. }
            | Action::Bezier { timing, .. }
            | Action::Rotate { timing, .. }
            | Action::Scale { timing, .. }
            | Action::Blink { timing, .. }
            | Action::FadeIn { timing }
            | Action::FadeOut { timing }
            | Action::Delay { timing } => Some(timing.duration),
        }
    }

    /// Check parameters that need no target (finite numbers, sane counts).
    pub fn validate_params(&self) -> Result<(), ActionError> {
        let kind = self.kind();
        let check_duration = |d: f32| {
            if d.is_finite() && d >= 0.0 {
                Ok(())
            } else {
                Err(ActionError::invalid(
                    kind,
                    format!("duration must be finite and >= 0, got {d}"),
                ))
            }
        };
        let check_vec = |v: Vec3, what: &str| {
            if is_finite(v) {
                Ok(())
            } else {
                Err(ActionError::invalid(kind, format!("{what} must be finite")))
            }
        };

        match self {
            Action::Place { position } => check_vec(*position, "position"),
            Action::Hide | Action::Show | Action::SetFrame { .. } => Ok(()),
            Action::CallFunc { name, .. } | Action::CallFuncS { name, .. } => {
                if name.is_empty() {
                    Err(ActionError::invalid(kind, "callback name is empty"))
                } else {
                    Ok(())
                }
            }
            Action::Goto { position, timing } => {
                check_vec(*position, "position")?;
                check_duration(timing.duration)
            }
            Action::MoveBy { delta, timing } => {
                check_vec(*delta, "delta")?;
                check_duration(timing.duration)
            }
            Action::JumpBy {
                delta,
                height,
                timing,
                ..
            } => {
                check_vec(*delta, "delta")?;
                if !height.is_finite() {
                    return Err(ActionError::invalid(kind, "height must be finite"));
                }
                check_duration(timing.duration)
            }
            Action::Bezier { path, timing } => {
                if !path.is_finite() {
                    return Err(ActionError::invalid(kind, "control points must be finite"));
                }
                check_duration(timing.duration)
            }
            Action::Rotate { angle: v, timing } | Action::Scale { factor: v, timing } => {
                if !v.is_finite() {
                    return Err(ActionError::invalid(kind, "amount must be finite"));
                }
                check_duration(timing.duration)
            }
            Action::Blink { times, timing } => {
                if *times == 0 {
                    return Err(ActionError::invalid(kind, "times must be >= 1"));
                }
                check_duration(timing.duration)
            }
            Action::FadeIn { timing } | Action::FadeOut { timing } | Action::Delay { timing } => {
                check_duration(timing.duration)
            }
            Action::Animate { .. } => Ok(()),
            Action::RandomDelay { min, max } => {
                check_duration(*min)?;
                check_duration(*max)?;
                if min > max {
                    return Err(ActionError::invalid(
                        kind,
                        format!("min ({min}) must not exceed max ({max})"),
                    ));
                }
                Ok(())
            }
            Action::Sequence { actions, .. } | Action::Spawn { actions } => {
                actions.iter().try_for_each(Action::validate_params)
            }
            Action::Repeat { action, .. } => action.validate_params(),
        }
    }

    /// Full construction check against the host that is about to run this template.
    pub fn validate_for(
        &self,
        target: &dyn Target,
        callbacks: &Callbacks,
    ) -> Result<(), ActionError> {
        self.validate_params()?;
        self.validate_bindings(target, callbacks)
    }

    fn validate_bindings(
        &self,
        target: &dyn Target,
        callbacks: &Callbacks,
    ) -> Result<(), ActionError> {
        match self {
            Action::Animate { animation, .. } => {
                lookup_animation(target, animation)?;
                Ok(())
            }
            Action::SetFrame { animation, index } => {
                let info = target
                    .animation(animation)
                    .ok_or_else(|| ActionError::UnknownAnimation {
                        name: animation.clone(),
                    })?;
                if *index >= info.frames {
                    return Err(ActionError::FrameOutOfRange {
                        name: animation.clone(),
                        index: *index,
                        frames: info.frames,
                    });
                }
                Ok(())
            }
            Action::CallFunc { name, .. } if !callbacks.has_plain(name) => {
                Err(ActionError::UnknownCallback { name: name.clone() })
            }
            Action::CallFuncS { name, .. } if !callbacks.has_with_target(name) => {
                Err(ActionError::UnknownCallback { name: name.clone() })
            }
            Action::Sequence { actions, .. } | Action::Spawn { actions } => actions
                .iter()
                .try_for_each(|a| a.validate_bindings(target, callbacks)),
            Action::Repeat { action, .. } => action.validate_bindings(target, callbacks),
            _ => Ok(()),
        }
    }
}

/// Resolve a named animation, rejecting unknown names and empty animations.
pub(crate) fn lookup_animation(
    target: &dyn Target,
    name: &str,
) -> Result<crate::target::AnimationInfo, ActionError> {
    let info = target
        .animation(name)
        .ok_or_else(|| ActionError::UnknownAnimation {
            name: name.to_string(),
        })?;
    if info.frames == 0 {
        return Err(ActionError::EmptyAnimation {
            name: name.to_string(),
        });
    }
    Ok(info)
}

/// `a + b` runs `a` then `b`.
impl Add for Action {
    type Output = Action;

    fn add(self, rhs: Action) -> Action {
        Action::sequence(vec![self, rhs])
    }
}

/// `a | b` fires `a` and `b` together.
impl BitOr for Action {
    type Output = Action;

    fn bitor(self, rhs: Action) -> Action {
        Action::spawn(vec![self, rhs])
    }
}
