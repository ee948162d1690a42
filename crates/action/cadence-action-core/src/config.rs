//! Host configuration for cadence-action-core.

use serde::{Deserialize, Serialize};

/// Configuration for host sizing and runtime behavior.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hint for the active-action arena.
    pub actions_capacity: usize,

    /// Seed for the host RNG (used by `RandomDelay`). `None` draws from entropy.
    pub seed: Option<u64>,

    /// Record `ActionEvent`s for every start, finish and stop.
    pub emit_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actions_capacity: 16,
            seed: None,
            emit_events: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.actions_capacity, 16);
        assert!(cfg.emit_events);
    }
}
