use bevy::prelude::*;
use std::collections::HashMap;

use shelfstock::stocking::ShuffleParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraAction {
    PanForward,
    PanBackward,
    PanLeft,
    PanRight,
    Rise,
    Sink,
}

#[derive(Default, Resource)]
pub struct ActionState {
    pressed: HashMap<CameraAction, bool>,
}

impl ActionState {
    pub fn set(&mut self, action: CameraAction, is_pressed: bool) {
        self.pressed.insert(action, is_pressed);
    }

    pub fn pressed(&self, action: CameraAction) -> bool {
        *self.pressed.get(&action).unwrap_or(&false)
    }
}

/// Values the demo's hotkeys edit before firing a shuffle.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ShuffleControls {
    pub params: ShuffleParams,
    pub occlusion_threshold: f32,
}

impl Default for ShuffleControls {
    fn default() -> Self {
        Self {
            params: ShuffleParams { density: 0.8, proximity: 0.6, organize: false, per_group: false },
            occlusion_threshold: 0.25,
        }
    }
}

impl ShuffleControls {
    pub const STEP: f32 = 0.1;

    pub fn nudge_density(&mut self, delta: f32) {
        self.params.density = (self.params.density + delta).clamp(0.0, 1.0);
    }

    pub fn nudge_proximity(&mut self, delta: f32) {
        self.params.proximity = (self.params.proximity + delta).clamp(0.0, 1.0);
    }
}
