//! Running action instances.
//!
//! An [`Instance`] is built from an [`Action`] template and owns every piece of
//! per-run state: elapsed `runtime`, `start_count`, captured baselines and,
//! for composites, its child instances. Behavior is a single match over the
//! closed [`Node`] sum type.
//!
//! Lifecycle: `start()` once, then any number of `step(dt)` calls, with
//! `restart()` standing in for `start()` whenever an enclosing loop re-enters.

mod composite;
mod leaf;

use rand::rngs::StdRng;

use crate::action::Action;
use crate::callbacks::Callbacks;
use crate::error::ActionError;
use crate::interval::{Direction, Interval, Timing};
use crate::target::Target;

pub use composite::{RepeatNode, SequenceNode};
pub use leaf::{InstantLeaf, TimedLeaf};

/// Everything an instance may touch while starting or stepping.
pub struct StepContext<'a> {
    pub target: &'a mut dyn Target,
    pub callbacks: &'a Callbacks,
    pub rng: &'a mut StdRng,
    /// Templates handed to the host by `Spawn`; bound after the current pass.
    pub spawned: &'a mut Vec<Action>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        target: &'a mut dyn Target,
        callbacks: &'a Callbacks,
        rng: &'a mut StdRng,
        spawned: &'a mut Vec<Action>,
    ) -> Self {
        Self {
            target,
            callbacks,
            rng,
            spawned,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Node {
    Instant(InstantLeaf),
    Timed { interval: Interval, leaf: TimedLeaf },
    Sequence(SequenceNode),
    Repeat(RepeatNode),
    /// Dispatcher: hands its templates to the host and is done at once.
    Spawn(Vec<Action>),
}

#[derive(Clone, Debug)]
pub struct Instance {
    runtime: f32,
    start_count: u32,
    node: Node,
}

impl Instance {
    /// Build fresh runtime state from a template. Nothing is bound or started yet.
    pub fn new(template: &Action) -> Self {
        let timed = |timing: &Timing, leaf: TimedLeaf| Node::Timed {
            interval: Interval::from(*timing),
            leaf,
        };
        let node = match template {
            Action::Place { position } => Node::Instant(InstantLeaf::Place(*position)),
            Action::Hide => Node::Instant(InstantLeaf::Hide),
            Action::Show => Node::Instant(InstantLeaf::Show),
            Action::SetFrame { animation, index } => Node::Instant(InstantLeaf::SetFrame {
                animation: animation.clone(),
                index: *index,
            }),
            Action::CallFunc { name, args } => Node::Instant(InstantLeaf::CallFunc {
                name: name.clone(),
                args: args.clone(),
            }),
            Action::CallFuncS { name, args } => Node::Instant(InstantLeaf::CallFuncS {
                name: name.clone(),
                args: args.clone(),
            }),
            Action::Goto { position, timing } => timed(timing, TimedLeaf::goto(*position)),
            Action::MoveBy { delta, timing } => timed(timing, TimedLeaf::move_by(*delta)),
            Action::JumpBy {
                delta,
                height,
                jumps,
                timing,
            } => timed(timing, TimedLeaf::jump_by(*delta, *height, *jumps)),
            Action::Bezier { path, timing } => timed(timing, TimedLeaf::bezier(*path)),
            Action::Rotate { angle, timing } => timed(timing, TimedLeaf::rotate(*angle)),
            Action::Scale { factor, timing } => timed(timing, TimedLeaf::scale(*factor)),
            Action::Blink { times, timing } => timed(timing, TimedLeaf::Blink { times: *times }),
            Action::FadeIn { timing } => timed(timing, TimedLeaf::FadeIn),
            Action::FadeOut { timing } => timed(timing, TimedLeaf::FadeOut),
            Action::Delay { timing } => timed(timing, TimedLeaf::Delay),
            Action::Animate {
                animation,
                direction,
                mode,
            } => Node::Timed {
                // Duration is filled in from the target's lookup on first start.
                interval: Interval {
                    duration: 0.0,
                    direction: *direction,
                    mode: *mode,
                },
                leaf: TimedLeaf::animate(animation),
            },
            Action::RandomDelay { min, max } => Node::Timed {
                interval: Interval::from(Timing::new(*min)),
                leaf: TimedLeaf::RandomDelay {
                    min: *min,
                    max: *max,
                },
            },
            Action::Sequence {
                actions,
                direction,
                mode,
            } => Node::Sequence(SequenceNode::new(actions, *direction, *mode)),
            Action::Repeat { action, times } => Node::Repeat(RepeatNode::new(action, *times)),
            Action::Spawn { actions } => Node::Spawn(actions.clone()),
        };
        Self {
            runtime: 0.0,
            start_count: 0,
            node,
        }
    }

    /// Seconds elapsed since the last start/restart.
    #[inline]
    pub fn runtime(&self) -> f32 {
        self.runtime
    }

    /// Overwrite the elapsed time of this run (seek).
    #[inline]
    pub fn set_runtime(&mut self, runtime: f32) {
        self.runtime = runtime;
    }

    /// Number of times this instance has been entered (start + restarts).
    #[inline]
    pub fn start_count(&self) -> u32 {
        self.start_count
    }

    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Logical time: direction-adjusted for timed leaves, raw runtime otherwise.
    pub fn get_runtime(&self) -> f32 {
        match &self.node {
            Node::Timed { interval, .. } => interval.get_runtime(self.runtime),
            _ => self.runtime,
        }
    }

    /// Interval duration of a timed leaf.
    pub fn duration(&self) -> Option<f32> {
        match &self.node {
            Node::Timed { interval, .. } => Some(interval.duration),
            _ => None,
        }
    }

    /// Current direction of a timed leaf or sequence.
    pub fn direction(&self) -> Option<Direction> {
        match &self.node {
            Node::Timed { interval, .. } => Some(interval.direction),
            Node::Sequence(seq) => Some(seq.direction),
            _ => None,
        }
    }

    /// First entry: capture baselines and reset all run state.
    pub fn start(&mut self, ctx: &mut StepContext<'_>) -> Result<(), ActionError> {
        self.runtime = 0.0;
        self.start_count = 1;
        match &mut self.node {
            Node::Instant(leaf) => leaf.fire(ctx),
            Node::Timed { interval, leaf } => leaf.capture(interval, ctx),
            Node::Sequence(seq) => seq.begin(self.start_count, ctx),
            Node::Repeat(rep) => rep.begin(self.start_count, ctx),
            Node::Spawn(actions) => {
                dispatch(actions, ctx);
                Ok(())
            }
        }
    }

    /// Re-entry from an enclosing loop.
    ///
    /// Timed leaves keep their captured baselines and only reset the clock
    /// (flipping direction under PingPong). Everything else re-runs its start path.
    pub fn restart(&mut self, ctx: &mut StepContext<'_>) -> Result<(), ActionError> {
        self.runtime = 0.0;
        self.start_count += 1;
        match &mut self.node {
            Node::Instant(leaf) => leaf.fire(ctx),
            Node::Timed { interval, .. } => {
                interval.on_restart();
                Ok(())
            }
            Node::Sequence(seq) => {
                seq.on_restart();
                seq.begin(self.start_count, ctx)
            }
            Node::Repeat(rep) => rep.begin(self.start_count, ctx),
            Node::Spawn(actions) => {
                dispatch(actions, ctx);
                Ok(())
            }
        }
    }

    /// Advance by `dt` seconds and apply this frame's mutation.
    pub fn step(&mut self, dt: f32, ctx: &mut StepContext<'_>) -> Result<(), ActionError> {
        debug_assert!(self.start_count > 0, "step() called before start()");
        self.runtime += dt;
        match &mut self.node {
            Node::Instant(_) | Node::Spawn(_) => Ok(()),
            Node::Timed { interval, leaf } => {
                leaf.apply(interval, self.runtime, ctx);
                Ok(())
            }
            Node::Sequence(seq) => seq.step(dt, self.start_count, ctx),
            Node::Repeat(rep) => rep.step(dt, self.start_count, ctx),
        }
    }

    /// Pure: calling it repeatedly without stepping never changes the answer.
    pub fn done(&self) -> bool {
        match &self.node {
            Node::Instant(_) | Node::Spawn(_) => true,
            Node::Timed { interval, .. } => interval.done(self.runtime),
            Node::Sequence(seq) => seq.done(),
            Node::Repeat(rep) => rep.done(),
        }
    }
}

fn dispatch(actions: &[Action], ctx: &mut StepContext<'_>) {
    log::trace!("spawn dispatching {} action(s)", actions.len());
    ctx.spawned.extend(actions.iter().cloned());
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::interval::Mode;
    use crate::target::Sprite;

    struct Rig {
        sprite: Sprite,
        callbacks: Callbacks,
        rng: StdRng,
        spawned: Vec<Action>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                sprite: Sprite::default(),
                callbacks: Callbacks::new(),
                rng: StdRng::seed_from_u64(1),
                spawned: Vec::new(),
            }
        }

        fn ctx(&mut self) -> StepContext<'_> {
            StepContext::new(
                &mut self.sprite,
                &self.callbacks,
                &mut self.rng,
                &mut self.spawned,
            )
        }
    }

    #[test]
    fn ping_pong_law_alternates_with_restart_parity() {
        let mut rig = Rig::new();
        let tpl = Action::move_by([10.0, 0.0, 0.0], 2.0).ping_pong();
        let mut inst = Instance::new(&tpl);
        inst.start(&mut rig.ctx()).unwrap();

        for restarts in 0..6u32 {
            if restarts > 0 {
                inst.restart(&mut rig.ctx()).unwrap();
            }
            inst.set_runtime(0.5);
            let expected = if restarts % 2 == 1 { 1.5 } else { 0.5 };
            assert_eq!(inst.get_runtime(), expected, "after {restarts} restarts");
        }
        assert_eq!(inst.start_count(), 6);
    }

    #[test]
    fn repeat_mode_restart_keeps_direction_and_baseline() {
        let mut rig = Rig::new();
        rig.sprite.position = [5.0, 0.0, 0.0];
        let mut inst = Instance::new(&Action::move_by([10.0, 0.0, 0.0], 1.0).with_mode(Mode::Repeat));
        inst.start(&mut rig.ctx()).unwrap();
        inst.step(1.5, &mut rig.ctx()).unwrap();
        assert_eq!(rig.sprite.position, [15.0, 0.0, 0.0]);

        inst.restart(&mut rig.ctx()).unwrap();
        assert_eq!(inst.direction(), Some(Direction::Forward));
        inst.step(0.5, &mut rig.ctx()).unwrap();
        // Baseline is still the position captured by the first start.
        assert_eq!(rig.sprite.position, [10.0, 0.0, 0.0]);
    }

    #[test]
    fn done_check_is_idempotent() {
        let mut rig = Rig::new();
        let mut inst = Instance::new(&(Action::delay(1.0) + Action::delay(1.0)));
        inst.start(&mut rig.ctx()).unwrap();
        for _ in 0..3 {
            assert!(!inst.done());
        }
        inst.step(1.5, &mut rig.ctx()).unwrap();
        inst.step(1.5, &mut rig.ctx()).unwrap();
        for _ in 0..3 {
            assert!(inst.done());
        }
    }

    #[test]
    fn spawn_hands_templates_to_the_host() {
        let mut rig = Rig::new();
        let mut inst = Instance::new(&(Action::hide() | Action::fade_out(1.0)));
        inst.start(&mut rig.ctx()).unwrap();
        assert!(inst.done());
        assert_eq!(rig.spawned, vec![Action::hide(), Action::fade_out(1.0)]);
    }
}
