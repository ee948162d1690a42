//! Host: owns a target and the action runs currently bound to it.
//!
//! Methods:
//! - new, with_callbacks, do_action (validate → instantiate → start → bind),
//!   step (step all → mark done → compact → bind spawned), stop, stop_all

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::action::Action;
use crate::callbacks::Callbacks;
use crate::config::Config;
use crate::error::ActionError;
use crate::events::ActionEvent;
use crate::ids::{ActionId, IdAllocator};
use crate::instance::{Instance, StepContext};
use crate::target::Target;

/// One arena slot. `finished` slots are compacted once per frame.
#[derive(Debug)]
struct Slot {
    id: ActionId,
    instance: Instance,
    finished: bool,
}

#[derive(Debug)]
pub struct Host<T: Target> {
    target: T,
    cfg: Config,
    ids: IdAllocator,
    /// Active runs in insertion order.
    slots: Vec<Slot>,
    callbacks: Callbacks,
    rng: StdRng,
    events: Vec<ActionEvent>,
}

impl<T: Target> Host<T> {
    pub fn new(target: T, cfg: Config) -> Self {
        Self::with_callbacks(target, cfg, Callbacks::new())
    }

    pub fn with_callbacks(target: T, cfg: Config, callbacks: Callbacks) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            target,
            slots: Vec::with_capacity(cfg.actions_capacity),
            cfg,
            ids: IdAllocator::new(),
            callbacks,
            rng,
            events: Vec::new(),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Bind a private run of `template` to this host and start it.
    ///
    /// The template is only read; every run gets fresh state. A run that is
    /// already done after `start()` (instants, Spawn) is not kept. Templates
    /// handed over by a Spawn are bound right away, in declaration order.
    ///
    /// On error nothing from this call stays bound: runs and events added by
    /// it are rolled back. Target writes already made by `start()` remain.
    pub fn do_action(&mut self, template: &Action) -> Result<ActionId, ActionError> {
        template.validate_for(&self.target, &self.callbacks)?;
        let slots_mark = self.slots.len();
        let events_mark = self.events.len();
        let mut spawned = Vec::new();
        let bound = self
            .bind(template, &mut spawned)
            .and_then(|id| self.bind_spawned(spawned).map(|()| id));
        if let Err(err) = &bound {
            warn!("do_action {} failed, rolling back: {}", template.kind(), err);
            self.slots.truncate(slots_mark);
            self.events.truncate(events_mark);
        }
        bound
    }

    /// Advance every active run by `dt` seconds, in insertion order.
    ///
    /// Finished runs are only marked during the pass and dropped after it.
    /// An error from any run stops the pass and is returned once the marked
    /// runs have been reaped and templates spawned earlier in the pass bound.
    pub fn step(&mut self, dt: f32) -> Result<(), ActionError> {
        let mut spawned = Vec::new();
        let mut result = Ok(());
        {
            let mut ctx = StepContext::new(
                &mut self.target,
                &self.callbacks,
                &mut self.rng,
                &mut spawned,
            );
            for slot in self.slots.iter_mut().filter(|s| !s.finished) {
                if let Err(err) = slot.instance.step(dt, &mut ctx) {
                    result = Err(err);
                    break;
                }
                if slot.instance.done() {
                    slot.finished = true;
                }
            }
        }
        self.reap();
        let bound = self.bind_spawned(spawned);
        result.and(bound)
    }

    /// Remove a run before it finishes. Returns `false` for unknown ids.
    pub fn stop(&mut self, id: ActionId) -> bool {
        match self.slots.iter().position(|s| s.id == id) {
            Some(pos) => {
                self.slots.remove(pos);
                debug!("stopped action {:?}", id);
                self.emit(ActionEvent::Stopped { id });
                true
            }
            None => {
                warn!("stop: no running action {:?}", id);
                false
            }
        }
    }

    pub fn stop_all(&mut self) {
        for slot in std::mem::take(&mut self.slots) {
            self.emit(ActionEvent::Stopped { id: slot.id });
        }
    }

    pub fn instance(&self, id: ActionId) -> Option<&Instance> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .map(|s| &s.instance)
    }

    pub fn instance_mut(&mut self, id: ActionId) -> Option<&mut Instance> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| &mut s.instance)
    }

    pub fn is_running(&self, id: ActionId) -> bool {
        self.instance(id).is_some()
    }

    /// Ids of active runs in stepping order.
    pub fn running_ids(&self) -> Vec<ActionId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_idle(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.events)
    }

    fn bind(&mut self, template: &Action, spawned: &mut Vec<Action>) -> Result<ActionId, ActionError> {
        let id = self.ids.alloc_action();
        let mut instance = Instance::new(template);
        {
            let mut ctx =
                StepContext::new(&mut self.target, &self.callbacks, &mut self.rng, spawned);
            instance.start(&mut ctx)?;
        }
        debug!("bound {} as {:?}", template.kind(), id);
        self.emit(ActionEvent::Started {
            id,
            kind: template.kind().to_string(),
        });
        if instance.done() {
            self.emit(ActionEvent::Finished { id });
        } else {
            self.slots.push(Slot {
                id,
                instance,
                finished: false,
            });
        }
        Ok(id)
    }

    /// Bind templates dispatched by Spawn. Nested spawns queue behind their siblings.
    fn bind_spawned(&mut self, mut pending: Vec<Action>) -> Result<(), ActionError> {
        let mut next = 0;
        while next < pending.len() {
            let template = pending[next].clone();
            trace!("binding spawned {}", template.kind());
            self.bind(&template, &mut pending)?;
            next += 1;
        }
        Ok(())
    }

    fn reap(&mut self) {
        if !self.slots.iter().any(|s| s.finished) {
            return;
        }
        let mut finished = Vec::new();
        self.slots.retain(|s| {
            if s.finished {
                finished.push(s.id);
            }
            !s.finished
        });
        for id in finished {
            debug!("reaped action {:?}", id);
            self.emit(ActionEvent::Finished { id });
        }
    }

    fn emit(&mut self, event: ActionEvent) {
        if self.cfg.emit_events {
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Sprite;

    fn seeded() -> Config {
        Config {
            seed: Some(42),
            ..Config::default()
        }
    }

    #[test]
    fn instants_are_not_kept() {
        let mut host = Host::new(Sprite::default(), seeded());
        let id = host.do_action(&Action::place([3.0, 4.0, 0.0])).unwrap();
        assert!(host.is_idle());
        assert_eq!(host.target().position, [3.0, 4.0, 0.0]);
        assert_eq!(
            host.drain_events(),
            vec![
                ActionEvent::Started {
                    id,
                    kind: "place".into()
                },
                ActionEvent::Finished { id }
            ]
        );
    }

    #[test]
    fn stop_removes_between_frames() {
        let mut host = Host::new(Sprite::default(), seeded());
        let a = host.do_action(&Action::move_by([10.0, 0.0, 0.0], 1.0)).unwrap();
        let b = host.do_action(&Action::rotate(90.0, 1.0)).unwrap();
        host.step(0.5).unwrap();
        assert!(host.stop(a));
        assert!(!host.stop(a));
        host.step(0.25).unwrap();
        assert_eq!(host.target().position, [5.0, 0.0, 0.0]);
        assert_eq!(host.running_ids(), vec![b]);
        host.stop_all();
        assert!(host.is_idle());
    }

    #[test]
    fn events_can_be_disabled() {
        let cfg = Config {
            emit_events: false,
            ..seeded()
        };
        let mut host = Host::new(Sprite::default(), cfg);
        host.do_action(&Action::delay(0.1)).unwrap();
        host.step(0.2).unwrap();
        assert!(host.is_idle());
        assert!(host.drain_events().is_empty());
    }
}
