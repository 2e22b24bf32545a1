// src/stocking/lowering.rs
use bevy::prelude::*;

use super::catalog::SceneCatalog;
use super::core::ShelfScene;

/// Drop every seated product by the per-level offset recorded when it was placed.
pub fn lower_onto_shelves<S: ShelfScene + ?Sized>(scene: &mut S, catalog: &mut SceneCatalog) -> usize {
    let mut lowered = 0;
    for member in catalog.groups.iter_mut().flat_map(|g| g.members.iter_mut()) {
        if !member.on_shelf || member.discarded {
            continue;
        }
        if member.shelf_offset != 0.0 {
            member.move_by(scene, Vec3::NEG_Z * member.shelf_offset);
            lowered += 1;
        }
    }
    lowered
}
