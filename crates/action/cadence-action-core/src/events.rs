//! Lifecycle events recorded by a host.
//!
//! Adapters drain these after `Host::step` to react to finished runs (chain
//! the next behavior, release a pooled node, play a sound) without polling.

use serde::{Deserialize, Serialize};

use crate::ids::ActionId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActionEvent {
    /// A template was bound and started (`kind` is its serialized tag).
    Started { id: ActionId, kind: String },
    /// The run reported done and was reaped.
    Finished { id: ActionId },
    /// The run was removed by `Host::stop`/`Host::stop_all` before finishing.
    Stopped { id: ActionId },
}
