//! Stocking plugin wiring (glue).
//! - Whitelist asset/loader
//! - Settings + loaded whitelist handle
//! - Shuffle / occlusion request events, run against a snapshot of `StockActor` entities

use bevy::prelude::*;
use bevy::render::mesh::{Indices, VertexAttributeValues};

use super::core::{ActorHandle, ShuffleParams};
use super::occlusion::OcclusionReport;
use super::registry::{WhitelistAssetPlugin, WhitelistDoc};
use super::scene::{LocalBox, MemoryScene, SceneActor};
use super::session::{ShuffleReport, ShuffleSession};
use super::settings::ShuffleSettings;

/// Where the whitelist lives and how sessions are tuned.
#[derive(Resource, Clone)]
pub struct StockingSettings {
    pub whitelist_path: String,
    pub shuffle: ShuffleSettings,
}
impl Default for StockingSettings {
    fn default() -> Self {
        Self {
            whitelist_path: "stocking/demo.whitelist.json".to_string(),
            shuffle: ShuffleSettings::default(),
        }
    }
}

/// Handle to the loaded whitelist asset.
#[derive(Resource, Default)]
pub struct WhitelistHandle(pub Handle<WhitelistDoc>);

/// Marks an entity the stocking passes may find by `Name`, move, scale and hide.
/// Colliders are in the entity's local space.
#[derive(Component, Clone, Debug, Default)]
pub struct StockActor {
    pub colliders: Vec<LocalBox>,
}

impl StockActor {
    pub fn from_scene_actor(actor: &SceneActor) -> Self {
        Self { colliders: actor.colliders.clone() }
    }
}

#[derive(Event, Clone, Copy, Debug)]
pub struct ShuffleRequested(pub ShuffleParams);

#[derive(Event, Clone, Copy, Debug)]
pub struct OcclusionRequested {
    pub threshold: f32,
}

/// Outcome of the most recent passes, for HUDs and tests.
#[derive(Resource, Default, Debug)]
pub struct LastStockingReport {
    pub shuffle: Option<ShuffleReport>,
    pub occlusion: Option<OcclusionReport>,
    pub error: Option<String>,
}

pub struct StockingPlugin;
impl Plugin for StockingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(WhitelistAssetPlugin)
            .init_resource::<StockingSettings>()
            .init_resource::<WhitelistHandle>()
            .init_resource::<LastStockingReport>()
            .add_event::<ShuffleRequested>()
            .add_event::<OcclusionRequested>()
            .add_systems(Startup, load_whitelist)
            .add_systems(Update, (monitor_whitelist_ready, run_stocking_requests));
    }
}

/// Startup: request loading the whitelist, store handle.
fn load_whitelist(
    mut handle_res: ResMut<WhitelistHandle>,
    settings: Res<StockingSettings>,
    assets: Res<AssetServer>,
) {
    if handle_res.0.is_strong() { return; }
    handle_res.0 = assets.load(settings.whitelist_path.as_str());
    info!(
        "Stocking: loading whitelist from '{}', seed={:?}",
        settings.whitelist_path, settings.shuffle.seed
    );
}

/// Update: log once when the whitelist becomes available.
fn monitor_whitelist_ready(
    handle_res: Res<WhitelistHandle>,
    docs: Res<Assets<WhitelistDoc>>,
    mut logged: Local<bool>,
) {
    if *logged { return; }
    if let Some(doc) = docs.get(&handle_res.0) {
        *logged = true;
        info!(
            "Stocking: whitelist ready ({} shelves, {} products)",
            doc.shelf_count(),
            doc.member_count()
        );
    }
}

type ActorQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Name, &'static mut Transform, &'static mut Visibility, &'static StockActor, Option<&'static Mesh3d>),
>;

/// Update: run every pending request against a snapshot of the stock actors,
/// then write transforms and visibility back.
fn run_stocking_requests(
    mut shuffles: EventReader<ShuffleRequested>,
    mut occlusions: EventReader<OcclusionRequested>,
    settings: Res<StockingSettings>,
    handle_res: Res<WhitelistHandle>,
    docs: Res<Assets<WhitelistDoc>>,
    meshes: Res<Assets<Mesh>>,
    mut actors: ActorQuery,
    mut last: ResMut<LastStockingReport>,
) {
    let shuffle_reqs: Vec<ShuffleParams> = shuffles.read().map(|e| e.0).collect();
    let occlusion_reqs: Vec<f32> = occlusions.read().map(|e| e.threshold).collect();
    if shuffle_reqs.is_empty() && occlusion_reqs.is_empty() {
        return;
    }
    let Some(doc) = docs.get(&handle_res.0) else {
        warn!("Stocking: request ignored, whitelist not loaded yet");
        return;
    };

    let (mut scene, entities) = snapshot_actors(&actors, &meshes);
    {
        let mut session = ShuffleSession::new(&mut scene, doc.clone(), settings.shuffle.clone());
        for params in shuffle_reqs {
            match session.run_shuffle(params) {
                Ok(report) => {
                    last.shuffle = Some(report);
                    last.error = None;
                }
                Err(e) => {
                    warn!("Stocking: shuffle failed: {e}");
                    last.error = Some(e.to_string());
                }
            }
        }
        for threshold in occlusion_reqs {
            match session.run_occlusion_pass(threshold) {
                Ok(report) => last.occlusion = Some(report),
                Err(e) => {
                    warn!("Stocking: occlusion pass failed: {e}");
                    last.error = Some(e.to_string());
                }
            }
        }
    }

    for (i, entity) in entities.iter().enumerate() {
        let (Some(actor), Ok((_, _, mut transform, mut visibility, _, _))) =
            (scene.actor(ActorHandle(i as u32)), actors.get_mut(*entity))
        else {
            continue;
        };
        transform.translation = actor.position;
        transform.scale = actor.scale;
        *visibility = if actor.visible { Visibility::Inherited } else { Visibility::Hidden };
    }
}

/// Copy every stock actor into an in-memory scene. Index `i` of the returned entity
/// list is `ActorHandle(i)` in the scene.
fn snapshot_actors(actors: &ActorQuery, meshes: &Assets<Mesh>) -> (MemoryScene, Vec<Entity>) {
    let mut scene = MemoryScene::new();
    let mut entities = Vec::new();
    for (entity, name, transform, visibility, stock, mesh3d) in actors.iter() {
        let mut actor = SceneActor::new(name.as_str(), transform.translation).with_scale(transform.scale);
        for b in &stock.colliders {
            actor = actor.with_box(*b);
        }
        if let Some(tris) = mesh3d.and_then(|m| meshes.get(&m.0)).and_then(mesh_triangles) {
            actor = actor.with_mesh(tris);
        }
        actor.visible = *visibility != Visibility::Hidden;
        scene.spawn(actor);
        entities.push(entity);
    }
    (scene, entities)
}

/// Local-space triangle list of a render mesh; `None` for unsupported layouts.
pub fn mesh_triangles(mesh: &Mesh) -> Option<Vec<[Vec3; 3]>> {
    let positions: &Vec<[f32; 3]> = match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
        VertexAttributeValues::Float32x3(v) => v,
        _ => return None,
    };
    let indices: Vec<u32> = match mesh.indices() {
        Some(Indices::U32(v)) => v.clone(),
        Some(Indices::U16(v)) => v.iter().map(|&x| x as u32).collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let vertex = |i: u32| positions.get(i as usize).map(|p| Vec3::from_array(*p));
    indices
        .chunks_exact(3)
        .map(|t| Some([vertex(t[0])?, vertex(t[1])?, vertex(t[2])?]))
        .collect()
}
