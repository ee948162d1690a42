use crate::action::Action;
use crate::error::ActionError;

/// Parse a stored action template from JSON and check its parameters.
///
/// Bindings that depend on a host (callback names, animation lookups) are
/// checked later, when the template is issued with `Host::do_action`.
pub fn parse_action_json(s: &str) -> Result<Action, ActionError> {
    let action: Action = serde_json::from_str(s).map_err(|e| ActionError::Parse {
        reason: e.to_string(),
    })?;
    action.validate_params()?;
    Ok(action)
}

/// Serialize a template to its stored JSON form.
pub fn action_to_json(action: &Action) -> Result<String, ActionError> {
    serde_json::to_string(action).map_err(|e| ActionError::Parse {
        reason: e.to_string(),
    })
}
