// src/stocking/core.rs
//! Core types/traits for shelf stocking.
//! Keep this file dependency-light; every engine pass builds on it.
//!
//! Axis convention used throughout: Z is up, X is the entry axis (a shelf's entry
//! face is its min-X face and products are pushed toward +X), Y is the lateral axis.

use bevy::prelude::*; // Vec3
use serde::{Deserialize, Serialize};

// ---------- Scene handles & bounds ----------

/// Non-owning reference to an actor living in the host scene.
/// The scene outlives every catalog built against it for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub u32);

/// World-space axis-aligned box stored as centre + half-extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub origin: Vec3,
    pub extent: Vec3,
}

impl Bounds {
    pub const ZERO: Self = Self { origin: Vec3::ZERO, extent: Vec3::ZERO };

    pub fn new(origin: Vec3, extent: Vec3) -> Self {
        Self { origin, extent: extent.abs() }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { origin: (min + max) * 0.5, extent: (max - min).abs() * 0.5 }
    }

    #[inline]
    pub fn min(&self) -> Vec3 { self.origin - self.extent }
    #[inline]
    pub fn max(&self) -> Vec3 { self.origin + self.extent }
    #[inline]
    pub fn size(&self) -> Vec3 { self.extent * 2.0 }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// True if the boxes interpenetrate by more than `tolerance` on every axis.
    /// Touching faces are not an overlap.
    pub fn penetrates(&self, other: &Bounds, tolerance: f32) -> bool {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        (a1.x - b0.x) > tolerance && (b1.x - a0.x) > tolerance
            && (a1.y - b0.y) > tolerance && (b1.y - a0.y) > tolerance
            && (a1.z - b0.z) > tolerance && (b1.z - a0.z) > tolerance
    }
}

// ---------- Host scene contract ----------

/// What the stocking engines need from the host scene. The engines never create
/// or destroy actors; they only look them up, query them, and move/scale/hide them.
pub trait ShelfScene {
    /// First actor whose name equals `name` exactly.
    fn resolve_by_name(&self, name: &str) -> Option<ActorHandle>;
    /// World-space bounds of the actor's colliders.
    fn world_bounds(&self, actor: ActorHandle) -> Bounds;
    /// Every other actor currently interpenetrating `actor`.
    fn overlapping(&self, actor: ActorHandle) -> Vec<ActorHandle>;
    /// Actor location (pivot) in world space.
    fn position(&self, actor: ActorHandle) -> Vec3;
    fn set_position(&mut self, actor: ActorHandle, position: Vec3);
    fn set_scale(&mut self, actor: ActorHandle, scale: Vec3);
    fn set_visible(&mut self, actor: ActorHandle, visible: bool);
    /// World-space render triangles.
    fn triangles(&self, actor: ActorHandle) -> Vec<[Vec3; 3]>;

    fn is_overlapping(&self, actor: ActorHandle) -> bool {
        !self.overlapping(actor).is_empty()
    }
}

// ---------- Catalog entities ----------

/// Common attributes of anything the whitelist names (shelves and products).
#[derive(Clone, Debug, PartialEq)]
pub struct Placeable {
    pub name: String,
    /// Target uniform scale from the whitelist.
    pub scale: f32,
    pub position: Vec3,
    /// Carried for completeness; no pass rotates actors.
    pub rotation: Vec3,
    pub actor: ActorHandle,
    pub discarded: bool,
    pub on_shelf: bool,
    /// World-space vertical correction recorded during placement.
    pub shelf_offset: f32,
}

impl Placeable {
    pub fn bind<S: ShelfScene + ?Sized>(name: &str, scale: f32, actor: ActorHandle, scene: &S) -> Self {
        Self {
            name: name.to_string(),
            scale,
            position: scene.position(actor),
            rotation: Vec3::ZERO,
            actor,
            discarded: false,
            on_shelf: false,
            shelf_offset: 0.0,
        }
    }

    #[inline]
    pub fn bounds<S: ShelfScene + ?Sized>(&self, scene: &S) -> Bounds {
        scene.world_bounds(self.actor)
    }

    pub fn move_to<S: ShelfScene + ?Sized>(&mut self, scene: &mut S, position: Vec3) {
        self.position = position;
        scene.set_position(self.actor, position);
    }

    pub fn move_by<S: ShelfScene + ?Sized>(&mut self, scene: &mut S, delta: Vec3) {
        let target = self.position + delta;
        self.move_to(scene, target);
    }

    pub fn apply_scale<S: ShelfScene + ?Sized>(&self, scene: &mut S, scale: Vec3) {
        scene.set_scale(self.actor, scale);
    }

    /// Move so the bounding box has its bottom at `bottom_z`, its front (min X)
    /// at `front_x` and its lateral centre at `lateral_y`.
    pub fn align<S: ShelfScene + ?Sized>(&mut self, scene: &mut S, bottom_z: f32, front_x: f32, lateral_y: f32) {
        let b = self.bounds(scene);
        let delta = Vec3::new(front_x - b.min().x, lateral_y - b.origin.y, bottom_z - b.min().z);
        self.move_by(scene, delta);
    }

    /// Terminal state for products that were not placed.
    pub fn discard<S: ShelfScene + ?Sized>(&mut self, scene: &mut S, discard_region: Vec3) {
        self.move_to(scene, discard_region);
        self.discarded = true;
        self.on_shelf = false;
    }

    /// Park off-shelf ahead of placement without marking as discarded.
    pub fn stage<S: ShelfScene + ?Sized>(&mut self, scene: &mut S, discard_region: Vec3) {
        self.move_to(scene, discard_region);
        self.discarded = false;
        self.on_shelf = false;
        self.shelf_offset = 0.0;
    }
}

/// Which end of a shelf the organize pass packs products against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompactDirection {
    /// Slide toward the shelf's min-Y end.
    #[default]
    TowardMinY,
    /// Slide toward the shelf's max-Y end.
    TowardMaxY,
}

impl CompactDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            CompactDirection::TowardMinY => -1.0,
            CompactDirection::TowardMaxY => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shelf {
    pub object: Placeable,
    /// Resting levels as 0..1 fractions of the shelf's vertical extent.
    pub base_heights: Vec<f32>,
    /// Per-level corrections, same fractions; index i pairs with `base_heights[i]`.
    pub offsets: Vec<f32>,
    pub compaction: CompactDirection,
}

impl Shelf {
    #[inline]
    pub fn name(&self) -> &str { &self.object.name }
    #[inline]
    pub fn level_count(&self) -> usize { self.base_heights.len() }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductGroup {
    pub name: String,
    /// Matched against `Shelf` names by exact equality.
    pub shelf_name: String,
    pub members: Vec<Placeable>,
    /// Set from configuration only.
    pub discarded: bool,
}

// ---------- Run inputs ----------

/// The four controls of one shuffle run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShuffleParams {
    /// Fraction of products kept, 0..=1.
    pub density: f32,
    /// Probability of clustered (vs random) placement, 0..=1.
    pub proximity: f32,
    pub organize: bool,
    /// Draw the density gate once per product group instead of once per product.
    pub per_group: bool,
}

impl Default for ShuffleParams {
    fn default() -> Self {
        Self { density: 0.5, proximity: 0.5, organize: false, per_group: false }
    }
}

impl ShuffleParams {
    pub fn new(density: f32, proximity: f32) -> Self {
        Self { density, proximity, ..Default::default() }
    }

    pub fn clamped(self) -> Self {
        Self {
            density: self.density.clamp(0.0, 1.0),
            proximity: self.proximity.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// One rasterized coverage record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcclusionSample {
    pub object: u32,
    /// View-axis coordinate; smaller is nearer.
    pub depth: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_penetrate() {
        let a = Bounds::from_min_max(Vec3::ZERO, Vec3::ONE);
        let b = Bounds::from_min_max(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.penetrates(&b, 1e-4));

        let c = Bounds::from_min_max(Vec3::splat(0.5), Vec3::splat(1.5));
        assert!(a.penetrates(&c, 1e-4));
    }

    #[test]
    fn union_covers_both() {
        let a = Bounds::from_min_max(Vec3::ZERO, Vec3::ONE);
        let b = Bounds::from_min_max(Vec3::new(-1.0, 2.0, 0.5), Vec3::new(0.5, 3.0, 4.0));
        let u = a.union(&b);
        assert_eq!(u.min(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(u.max(), Vec3::new(1.0, 3.0, 4.0));
    }

    #[test]
    fn params_clamp_into_unit_range() {
        let p = ShuffleParams { density: 1.7, proximity: -0.2, organize: true, per_group: false }.clamped();
        assert_eq!(p.density, 1.0);
        assert_eq!(p.proximity, 0.0);
        assert!(p.organize);
    }
}
