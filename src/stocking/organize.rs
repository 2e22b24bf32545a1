// src/stocking/organize.rs
//! Optional tidy-up: slide seated products along each shelf toward its compaction end.

use bevy::prelude::*;

use super::catalog::SceneCatalog;
use super::core::{Bounds, CompactDirection, ShelfScene};
use super::settings::ShuffleSettings;

/// Returns how many products moved at least one step.
pub fn organize_shelves<S: ShelfScene + ?Sized>(
    scene: &mut S,
    catalog: &mut SceneCatalog,
    settings: &ShuffleSettings,
) -> usize {
    let step = settings.organize_step;
    if step <= 0.0 {
        return 0;
    }
    let SceneCatalog { shelves, groups } = catalog;
    let mut moved = 0;

    for shelf in shelves.iter() {
        let shelf_bounds = shelf.object.bounds(scene);
        let direction = shelf.compaction;

        let mut order: Vec<(usize, usize, Bounds)> = Vec::new();
        for (gi, group) in groups.iter().enumerate() {
            if group.discarded || group.shelf_name != shelf.name() {
                continue;
            }
            for (mi, member) in group.members.iter().enumerate() {
                if member.on_shelf && !member.discarded {
                    order.push((gi, mi, member.bounds(scene)));
                }
            }
        }
        // Products nearest the compaction end go first so each one packs against the last.
        match direction {
            CompactDirection::TowardMinY => order.sort_by(|a, b| a.2.min().y.total_cmp(&b.2.min().y)),
            CompactDirection::TowardMaxY => order.sort_by(|a, b| b.2.max().y.total_cmp(&a.2.max().y)),
        }

        let max_steps = (shelf_bounds.size().y / step).ceil() as u32 + 1;
        let delta = Vec3::Y * direction.sign() * step;

        for (gi, mi, _) in order {
            let member = &mut groups[gi].members[mi];
            let mut steps = 0;
            for _ in 0..max_steps {
                let previous = member.position;
                member.move_by(scene, delta);
                let b = member.bounds(scene);
                let inside = b.min().y >= shelf_bounds.min().y && b.max().y <= shelf_bounds.max().y;
                if !inside || scene.is_overlapping(member.actor) {
                    member.move_to(scene, previous);
                    break;
                }
                steps += 1;
            }
            if steps > 0 {
                moved += 1;
            }
        }
        debug!("Stocking: organized shelf '{}' toward {:?}", shelf.name(), direction);
    }
    moved
}
