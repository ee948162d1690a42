//! The target contract: the attributes an action is allowed to mutate.
//!
//! Hosts (scene nodes, sprites, adapters for an external renderer) implement
//! [`Target`]; the core never sees anything else about them.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Frame layout of a named animation known to a target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationInfo {
    pub frames: usize,
    /// Seconds each frame stays on screen.
    pub frame_duration: f32,
}

impl AnimationInfo {
    pub fn duration(&self) -> f32 {
        self.frames as f32 * self.frame_duration
    }
}

/// Mutable attribute access consumed by leaf actions.
pub trait Target {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);

    /// Rotation in degrees.
    fn rotation(&self) -> f32;
    fn set_rotation(&mut self, degrees: f32);

    /// Uniform scale factor.
    fn scale(&self) -> f32;
    fn set_scale(&mut self, scale: f32);

    /// Opacity in [0, 1].
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);

    fn visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn frame(&self) -> usize;
    fn set_frame(&mut self, frame: usize);

    /// Select the animation whose frames `set_frame` indexes into.
    fn set_animation(&mut self, _name: &str) {}

    /// Named animation lookup. Targets without animations return `None`.
    fn animation(&self, _name: &str) -> Option<AnimationInfo> {
        None
    }
}

/// Plain-data target: enough state for every leaf action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub position: Vec3,
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub visible: bool,
    pub frame: usize,
    #[serde(default)]
    pub current_animation: Option<String>,
    #[serde(default)]
    pub animations: HashMap<String, AnimationInfo>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            visible: true,
            frame: 0,
            current_animation: None,
            animations: HashMap::new(),
        }
    }
}

impl Sprite {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Register a named animation (builder style).
    pub fn with_animation(mut self, name: &str, frames: usize, frame_duration: f32) -> Self {
        self.animations.insert(
            name.to_string(),
            AnimationInfo {
                frames,
                frame_duration,
            },
        );
        self
    }
}

impl Target for Sprite {
    fn position(&self) -> Vec3 {
        self.position
    }
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
    fn rotation(&self) -> f32 {
        self.rotation
    }
    fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }
    fn scale(&self) -> f32 {
        self.scale
    }
    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
    fn opacity(&self) -> f32 {
        self.opacity
    }
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
    fn visible(&self) -> bool {
        self.visible
    }
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
    fn frame(&self) -> usize {
        self.frame
    }
    fn set_frame(&mut self, frame: usize) {
        self.frame = frame;
    }
    fn set_animation(&mut self, name: &str) {
        self.current_animation = Some(name.to_string());
    }
    fn animation(&self, name: &str) -> Option<AnimationInfo> {
        self.animations.get(name).copied()
    }
}
