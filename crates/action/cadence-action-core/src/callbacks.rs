//! Named callback registry for `CallFunc` / `CallFuncS`.
//!
//! Templates carry only a callback *name* plus JSON arguments. The host owns a
//! registry of free functions, so cloning a template never has to copy a
//! closure over host state.

use hashbrown::HashMap;
use serde_json::Value as JsonValue;

use crate::error::ActionError;
use crate::target::Target;

/// Callback invoked with the action's arguments only.
pub type CallFn = fn(&[JsonValue]) -> Result<(), String>;

/// Callback invoked with the bound target and the action's arguments.
pub type CallFnS = fn(&mut dyn Target, &[JsonValue]) -> Result<(), String>;

#[derive(Clone, Default)]
pub struct Callbacks {
    plain: HashMap<String, CallFn>,
    with_target: HashMap<String, CallFnS>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("plain", &self.plain.keys().collect::<Vec<_>>())
            .field("with_target", &self.with_target.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a plain callback.
    pub fn register(&mut self, name: &str, f: CallFn) -> &mut Self {
        self.plain.insert(name.to_string(), f);
        self
    }

    /// Register (or replace) a target-receiving callback.
    pub fn register_with_target(&mut self, name: &str, f: CallFnS) -> &mut Self {
        self.with_target.insert(name.to_string(), f);
        self
    }

    pub fn has_plain(&self, name: &str) -> bool {
        self.plain.contains_key(name)
    }

    pub fn has_with_target(&self, name: &str) -> bool {
        self.with_target.contains_key(name)
    }

    pub(crate) fn call(&self, name: &str, args: &[JsonValue]) -> Result<(), ActionError> {
        let f = self
            .plain
            .get(name)
            .ok_or_else(|| ActionError::UnknownCallback {
                name: name.to_string(),
            })?;
        f(args).map_err(|reason| ActionError::Callback {
            name: name.to_string(),
            reason,
        })
    }

    pub(crate) fn call_with_target(
        &self,
        name: &str,
        target: &mut dyn Target,
        args: &[JsonValue],
    ) -> Result<(), ActionError> {
        let f = self
            .with_target
            .get(name)
            .ok_or_else(|| ActionError::UnknownCallback {
                name: name.to_string(),
            })?;
        f(target, args).map_err(|reason| ActionError::Callback {
            name: name.to_string(),
            reason,
        })
    }
}
