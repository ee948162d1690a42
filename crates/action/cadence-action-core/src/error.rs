//! Error types for action construction and stepping.

/// Errors surfaced by `Host::do_action` (construction) and `Host::step` (runtime).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ActionError {
    /// A template parameter is out of its valid domain.
    #[error("invalid {action} parameter: {reason}")]
    InvalidParameter {
        action: &'static str,
        reason: String,
    },

    /// `Animate` named an animation the target does not know.
    #[error("animation not found: {name}")]
    UnknownAnimation { name: String },

    /// `Animate` named an animation with no frames.
    #[error("animation has no frames: {name}")]
    EmptyAnimation { name: String },

    /// A frame lookup selected an index outside the animation.
    #[error("frame {index} out of range for animation {name} ({frames} frames)")]
    FrameOutOfRange {
        name: String,
        index: usize,
        frames: usize,
    },

    /// `CallFunc`/`CallFuncS` referenced a handle missing from the registry.
    #[error("callback not registered: {name}")]
    UnknownCallback { name: String },

    /// A registered callback reported failure.
    #[error("callback {name} failed: {reason}")]
    Callback { name: String, reason: String },

    /// Stored template JSON could not be decoded.
    #[error("parse error: {reason}")]
    Parse { reason: String },
}

impl ActionError {
    pub(crate) fn invalid(action: &'static str, reason: impl Into<String>) -> Self {
        ActionError::InvalidParameter {
            action,
            reason: reason.into(),
        }
    }
}
