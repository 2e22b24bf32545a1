// src/stocking/settings.rs
//! Tunables for one shuffle session. Loadable from RON; every field has a default.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShuffleSettings {
    /// Attempts per product before it is discarded.
    #[serde(default = "default_max_try_times")]
    pub max_try_times: u32,
    /// Distance kept clear of each lateral shelf end when drawing random positions.
    #[serde(default = "default_end_margin")]
    pub end_margin: f32,
    /// Entry-axis increment used when seating a product against what is behind it.
    #[serde(default = "default_step")]
    pub push_step: f32,
    /// Lateral increment used by the organize pass.
    #[serde(default = "default_step")]
    pub organize_step: f32,
    /// Upper bound of the random slack added to each clustered-anchor perturbation.
    #[serde(default = "default_cluster_margin")]
    pub cluster_margin: f32,
    /// Vertical scale factor applied before placement (fraction of target).
    #[serde(default = "default_shrink_z")]
    pub shrink_z: f32,
    /// Uniform scale added per growth step.
    #[serde(default = "default_grow_step")]
    pub grow_step: f32,
    #[serde(default = "default_grow_steps_per_round")]
    pub grow_steps_per_round: u32,
    #[serde(default = "default_grow_rounds")]
    pub grow_rounds: u32,
    /// Where discarded products are parked. Must sit below every shelf.
    #[serde(default = "default_discard_region")]
    pub discard_region: Vec3,
    #[serde(default = "default_raster_size")]
    pub raster_width: u32,
    #[serde(default = "default_raster_size")]
    pub raster_height: u32,
    /// Fixed seed reseeds every run; `None` draws a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_try_times() -> u32 { 50 }
fn default_end_margin() -> f32 { 0.05 }
fn default_step() -> f32 { 0.01 }
fn default_cluster_margin() -> f32 { 0.02 }
fn default_shrink_z() -> f32 { 0.3 }
fn default_grow_step() -> f32 { 0.02 }
fn default_grow_steps_per_round() -> u32 { 4 }
fn default_grow_rounds() -> u32 { 200 }
fn default_discard_region() -> Vec3 { Vec3::new(0.0, 0.0, -100.0) }
fn default_raster_size() -> u32 { 256 }

impl Default for ShuffleSettings {
    fn default() -> Self {
        Self {
            max_try_times: default_max_try_times(),
            end_margin: default_end_margin(),
            push_step: default_step(),
            organize_step: default_step(),
            cluster_margin: default_cluster_margin(),
            shrink_z: default_shrink_z(),
            grow_step: default_grow_step(),
            grow_steps_per_round: default_grow_steps_per_round(),
            grow_rounds: default_grow_rounds(),
            discard_region: default_discard_region(),
            raster_width: default_raster_size(),
            raster_height: default_raster_size(),
            seed: None,
        }
    }
}

impl ShuffleSettings {
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::de::from_str(text)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
