//! Composite schedulers: Sequence and Repeat.
//!
//! Both own their child instances for the lifetime of the run. A child is
//! `start()`ed only on the composite's very first entry; every later entry
//! (a new lap of an enclosing loop) `restart()`s it, so ping-pong children
//! keep flipping and relative leaves keep their baselines.
//!
//! When a child finishes, the next one is entered within the same frame but
//! receives no time until the following `step`.

use super::{Instance, StepContext};
use crate::action::{Action, RepeatCount};
use crate::error::ActionError;
use crate::interval::{Direction, Mode};

#[derive(Clone, Debug)]
pub struct SequenceNode {
    children: Vec<Instance>,
    /// Children completed in the current traversal.
    count: usize,
    /// Index of the active child.
    current: Option<usize>,
    pub direction: Direction,
    pub mode: Mode,
}

impl SequenceNode {
    pub(crate) fn new(actions: &[Action], direction: Direction, mode: Mode) -> Self {
        Self {
            children: actions.iter().map(Instance::new).collect(),
            count: 0,
            current: None,
            direction,
            mode,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn children(&self) -> &[Instance] {
        &self.children
    }

    #[inline]
    pub fn done(&self) -> bool {
        self.count >= self.children.len()
    }

    pub(crate) fn on_restart(&mut self) {
        if self.mode == Mode::PingPong {
            self.direction = self.direction.flipped();
        }
    }

    /// Start path: rewind the traversal and enter its first child.
    pub(crate) fn begin(
        &mut self,
        start_count: u32,
        ctx: &mut StepContext<'_>,
    ) -> Result<(), ActionError> {
        self.count = 0;
        self.current = None;
        if self.done() {
            return Ok(());
        }
        self.instantiate(start_count, ctx)
    }

    fn instantiate(&mut self, start_count: u32, ctx: &mut StepContext<'_>) -> Result<(), ActionError> {
        let n = self.children.len();
        let index = match self.direction {
            Direction::Forward => self.count,
            Direction::Backward => n - self.count - 1,
        };
        self.current = Some(index);
        let child = &mut self.children[index];
        if start_count == 1 {
            child.start(ctx)
        } else {
            child.restart(ctx)
        }
    }

    pub(crate) fn step(
        &mut self,
        dt: f32,
        start_count: u32,
        ctx: &mut StepContext<'_>,
    ) -> Result<(), ActionError> {
        let Some(index) = self.current else {
            return Ok(());
        };
        if self.done() {
            return Ok(());
        }
        let child = &mut self.children[index];
        child.step(dt, ctx)?;
        if child.done() {
            self.count += 1;
            if !self.done() {
                self.instantiate(start_count, ctx)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RepeatNode {
    child: Box<Instance>,
    /// Completed laps.
    count: u32,
    times: RepeatCount,
}

impl RepeatNode {
    pub(crate) fn new(action: &Action, times: RepeatCount) -> Self {
        Self {
            child: Box::new(Instance::new(action)),
            count: 0,
            times,
        }
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn times(&self) -> RepeatCount {
        self.times
    }

    pub fn child(&self) -> &Instance {
        &self.child
    }

    /// `Forever` never completes.
    #[inline]
    pub fn done(&self) -> bool {
        match self.times {
            RepeatCount::Times(n) => self.count >= n,
            RepeatCount::Forever => false,
        }
    }

    pub(crate) fn begin(
        &mut self,
        start_count: u32,
        ctx: &mut StepContext<'_>,
    ) -> Result<(), ActionError> {
        self.count = 0;
        if self.done() {
            return Ok(());
        }
        self.instantiate(start_count, ctx)
    }

    fn instantiate(&mut self, start_count: u32, ctx: &mut StepContext<'_>) -> Result<(), ActionError> {
        if start_count == 1 && self.count == 0 {
            self.child.start(ctx)
        } else {
            self.child.restart(ctx)
        }
    }

    pub(crate) fn step(
        &mut self,
        dt: f32,
        start_count: u32,
        ctx: &mut StepContext<'_>,
    ) -> Result<(), ActionError> {
        if self.done() {
            return Ok(());
        }
        self.child.step(dt, ctx)?;
        if self.child.done() {
            self.count += 1;
            if !self.done() {
                self.instantiate(start_count, ctx)?;
            }
        }
        Ok(())
    }
}
