// src/stocking/scene.rs
//! In-memory host scene: named actors made of axis-aligned collider boxes.
//! The Bevy plugin snapshots ECS entities into one of these, and tests build them directly.

use bevy::prelude::*;

use super::core::{ActorHandle, Bounds, ShelfScene};

/// Penetration depth below which two boxes are considered merely touching.
pub const DEFAULT_CONTACT_TOLERANCE: f32 = 1e-4;

/// Collider box in actor-local space (before scale and translation).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalBox {
    pub center: Vec3,
    pub half: Vec3,
}

impl LocalBox {
    pub const fn new(center: Vec3, half: Vec3) -> Self { Self { center, half } }

    /// Box centred on the actor pivot.
    pub const fn centered(half: Vec3) -> Self { Self { center: Vec3::ZERO, half } }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { center: (min + max) * 0.5, half: (max - min).abs() * 0.5 }
    }

    #[inline]
    pub fn to_world(&self, position: Vec3, scale: Vec3) -> Bounds {
        Bounds::new(position + self.center * scale, self.half * scale.abs())
    }

    /// The 12 triangles of the box surface, local space.
    pub fn triangles(&self) -> Vec<[Vec3; 3]> {
        let (c, h) = (self.center, self.half);
        let v = |sx: f32, sy: f32, sz: f32| c + Vec3::new(sx * h.x, sy * h.y, sz * h.z);
        let corners = [
            v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(-1.0, 1.0, -1.0),
            v(-1.0, -1.0, 1.0), v(1.0, -1.0, 1.0), v(1.0, 1.0, 1.0), v(-1.0, 1.0, 1.0),
        ];
        const FACES: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // bottom
            [4, 5, 6, 7], // top
            [0, 1, 5, 4], // -Y
            [2, 3, 7, 6], // +Y
            [0, 4, 7, 3], // -X
            [1, 2, 6, 5], // +X
        ];
        let mut out = Vec::with_capacity(12);
        for [a, b, c2, d] in FACES {
            out.push([corners[a], corners[b], corners[c2]]);
            out.push([corners[a], corners[c2], corners[d]]);
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct SceneActor {
    pub name: String,
    pub position: Vec3,
    pub scale: Vec3,
    pub visible: bool,
    pub colliders: Vec<LocalBox>,
    /// Render triangles, local space.
    pub mesh: Vec<[Vec3; 3]>,
}

impl SceneActor {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            scale: Vec3::ONE,
            visible: true,
            colliders: Vec::new(),
            mesh: Vec::new(),
        }
    }

    /// Adds a collider and renders it as a box.
    pub fn with_box(mut self, b: LocalBox) -> Self {
        self.mesh.extend(b.triangles());
        self.colliders.push(b);
        self
    }

    /// Adds a collider only.
    pub fn with_collider(mut self, b: LocalBox) -> Self {
        self.colliders.push(b);
        self
    }

    pub fn with_mesh(mut self, tris: Vec<[Vec3; 3]>) -> Self {
        self.mesh = tris;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn world_colliders(&self) -> impl Iterator<Item = Bounds> + '_ {
        self.colliders.iter().map(|c| c.to_world(self.position, self.scale))
    }

    pub fn world_bounds(&self) -> Bounds {
        let mut it = self.world_colliders();
        if let Some(first) = it.next() {
            return it.fold(first, |acc, b| acc.union(&b));
        }
        // No colliders: fall back to the render mesh, then to the bare pivot.
        let mut pts = self.mesh.iter().flatten().map(|p| self.position + *p * self.scale);
        match pts.next() {
            Some(p0) => {
                let (mn, mx) = pts.fold((p0, p0), |(mn, mx), p| (mn.min(p), mx.max(p)));
                Bounds::from_min_max(mn, mx)
            }
            None => Bounds::new(self.position, Vec3::ZERO),
        }
    }
}

/// Builds a shelf actor: two side panels, a back panel, and one board per level.
/// `size` is the full (depth X, width Y, height Z); the pivot sits at the front-left-bottom
/// corner. Board tops land exactly on `level_fractions[i] * size.z`.
pub fn shelf_actor(name: impl Into<String>, position: Vec3, size: Vec3, level_fractions: &[f32], thickness: f32) -> SceneActor {
    let t = thickness.max(0.0);
    let mut actor = SceneActor::new(name, position)
        // side panels
        .with_box(LocalBox::from_min_max(Vec3::ZERO, Vec3::new(size.x, t, size.z)))
        .with_box(LocalBox::from_min_max(Vec3::new(0.0, size.y - t, 0.0), Vec3::new(size.x, size.y, size.z)))
        // back panel
        .with_box(LocalBox::from_min_max(Vec3::new(size.x - t, t, 0.0), Vec3::new(size.x, size.y - t, size.z)));

    for f in level_fractions {
        let top = f.clamp(0.0, 1.0) * size.z;
        let bottom = (top - t).max(0.0);
        if top - bottom <= 0.0 { continue; }
        actor = actor.with_box(LocalBox::from_min_max(
            Vec3::new(0.0, t, bottom),
            Vec3::new(size.x - t, size.y - t, top),
        ));
    }
    actor
}

/// Product actor: one box with its pivot at the centre of its bottom face.
pub fn product_actor(name: impl Into<String>, position: Vec3, size: Vec3) -> SceneActor {
    let half = size * 0.5;
    SceneActor::new(name, position).with_box(LocalBox::new(Vec3::new(0.0, 0.0, half.z), half))
}

#[derive(Clone, Debug)]
pub struct MemoryScene {
    actors: Vec<SceneActor>,
    contact_tolerance: f32,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self { actors: Vec::new(), contact_tolerance: DEFAULT_CONTACT_TOLERANCE }
    }
}

impl MemoryScene {
    pub fn new() -> Self { Self::default() }

    pub fn with_contact_tolerance(mut self, tolerance: f32) -> Self {
        self.contact_tolerance = tolerance.max(0.0);
        self
    }

    pub fn spawn(&mut self, actor: SceneActor) -> ActorHandle {
        self.actors.push(actor);
        ActorHandle((self.actors.len() - 1) as u32)
    }

    pub fn actor(&self, handle: ActorHandle) -> Option<&SceneActor> {
        self.actors.get(handle.0 as usize)
    }

    pub fn actor_mut(&mut self, handle: ActorHandle) -> Option<&mut SceneActor> {
        self.actors.get_mut(handle.0 as usize)
    }

    pub fn actor_named(&self, name: &str) -> Option<&SceneActor> {
        self.resolve_by_name(name).and_then(|h| self.actor(h))
    }

    pub fn actors(&self) -> &[SceneActor] { &self.actors }

    pub fn len(&self) -> usize { self.actors.len() }

    pub fn is_empty(&self) -> bool { self.actors.is_empty() }
}

impl ShelfScene for MemoryScene {
    fn resolve_by_name(&self, name: &str) -> Option<ActorHandle> {
        self.actors
            .iter()
            .position(|a| a.name == name)
            .map(|i| ActorHandle(i as u32))
    }

    fn world_bounds(&self, actor: ActorHandle) -> Bounds {
        self.actor(actor).map(SceneActor::world_bounds).unwrap_or(Bounds::ZERO)
    }

    fn overlapping(&self, actor: ActorHandle) -> Vec<ActorHandle> {
        let Some(me) = self.actor(actor) else { return Vec::new() };
        let mine: Vec<Bounds> = me.world_colliders().collect();
        if mine.is_empty() { return Vec::new(); }

        let tol = self.contact_tolerance;
        self.actors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i as u32 != actor.0)
            .filter(|(_, other)| {
                other.world_colliders().any(|ob| mine.iter().any(|mb| mb.penetrates(&ob, tol)))
            })
            .map(|(i, _)| ActorHandle(i as u32))
            .collect()
    }

    fn position(&self, actor: ActorHandle) -> Vec3 {
        self.actor(actor).map(|a| a.position).unwrap_or(Vec3::ZERO)
    }

    fn set_position(&mut self, actor: ActorHandle, position: Vec3) {
        if let Some(a) = self.actor_mut(actor) {
            a.position = position;
        }
    }

    fn set_scale(&mut self, actor: ActorHandle, scale: Vec3) {
        if let Some(a) = self.actor_mut(actor) {
            a.scale = scale;
        }
    }

    fn set_visible(&mut self, actor: ActorHandle, visible: bool) {
        if let Some(a) = self.actor_mut(actor) {
            a.visible = visible;
        }
    }

    fn triangles(&self, actor: ActorHandle) -> Vec<[Vec3; 3]> {
        let Some(a) = self.actor(actor) else { return Vec::new() };
        a.mesh
            .iter()
            .map(|t| t.map(|p| a.position + p * a.scale))
            .collect()
    }
}
