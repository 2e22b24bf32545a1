// src/stocking/occlusion/mod.rs
//! Occlusion estimator: rasterize candidate products seen from the shelf fronts and
//! hide the ones that show too little of themselves.

use bevy::prelude::*;

use crate::stocking::catalog::SceneCatalog;
use crate::stocking::core::{ActorHandle, Bounds, ShelfScene};
use crate::stocking::settings::ShuffleSettings;

mod raster;

pub use raster::{Coverage, DepthRaster};

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectVisibility {
    pub name: String,
    pub actor: ActorHandle,
    pub coverage: Coverage,
    pub ratio: f32,
    pub shown: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OcclusionReport {
    pub objects: Vec<ObjectVisibility>,
    pub hidden: usize,
}

impl OcclusionReport {
    pub fn get(&self, name: &str) -> Option<&ObjectVisibility> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// Union of every bound shelf's bounds; `None` without shelves.
pub fn shelf_window<S: ShelfScene + ?Sized>(scene: &S, catalog: &SceneCatalog) -> Option<Bounds> {
    catalog
        .shelves
        .iter()
        .map(|s| s.object.bounds(scene))
        .reduce(|acc, b| acc.union(&b))
}

/// Rasterize candidates, compute `visible / total` per object and show or hide each
/// one against `threshold`. Products outside the shelf window are left untouched.
pub fn estimate_visibility<S: ShelfScene + ?Sized>(
    scene: &mut S,
    catalog: &SceneCatalog,
    settings: &ShuffleSettings,
    threshold: f32,
) -> OcclusionReport {
    let Some(window) = shelf_window(scene, catalog) else {
        warn!("Stocking: occlusion pass skipped, no shelves bound");
        return OcclusionReport::default();
    };
    let (lo, hi) = (window.min(), window.max());

    let candidates: Vec<_> = catalog
        .products()
        .filter(|p| !p.discarded)
        .filter(|p| {
            let o = scene.position(p.actor);
            o.y >= lo.y && o.y <= hi.y && o.z >= lo.z
        })
        .collect();

    let mut raster = DepthRaster::new(&window, settings.raster_width, settings.raster_height);
    for (i, p) in candidates.iter().enumerate() {
        for tri in scene.triangles(p.actor) {
            raster.rasterize(i as u32, &tri);
        }
    }
    let coverage = raster.resolve(candidates.len());

    let mut report = OcclusionReport::default();
    for (p, cov) in candidates.into_iter().zip(coverage) {
        let ratio = cov.ratio();
        let shown = ratio >= threshold;
        scene.set_visible(p.actor, shown);
        if !shown {
            report.hidden += 1;
        }
        report.objects.push(ObjectVisibility { name: p.name.clone(), actor: p.actor, coverage: cov, ratio, shown });
    }

    info!(
        "Stocking: occlusion over {} products ({} px covered), {} hidden at threshold {:.2}",
        report.objects.len(),
        raster.covered_pixels(),
        report.hidden,
        threshold
    );
    report
}
