//! Cadence Action Core (engine-agnostic)
//!
//! Composable, time-driven actions that mutate a host object's visual state
//! (position, rotation, scale, opacity, visibility, animation frame) frame by
//! frame. Templates ([`Action`]) describe parameters only; a [`Host`] turns
//! each `do_action` call into a private running [`Instance`] and advances all
//! of them once per `step(dt)`.

pub mod action;
pub mod callbacks;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod ids;
pub mod instance;
pub mod interval;
pub mod math;
pub mod stored;
pub mod target;

// Re-exports for consumers (adapters)
pub use action::{Action, RepeatCount};
pub use callbacks::{CallFn, CallFnS, Callbacks};
pub use config::Config;
pub use error::ActionError;
pub use events::ActionEvent;
pub use host::Host;
pub use ids::ActionId;
pub use instance::{Instance, Node, StepContext};
pub use interval::{Direction, Interval, Mode, Timing};
pub use math::{BezierPath, Vec3};
pub use stored::{action_to_json, parse_action_json};
pub use target::{AnimationInfo, Sprite, Target};
