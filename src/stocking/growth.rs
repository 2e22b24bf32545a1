// src/stocking/growth.rs
//! Shrink products before placement, then grow them back toward their target
//! scale once everything is seated, halting each one at its first contact.

use bevy::prelude::*;

use super::catalog::SceneCatalog;
use super::core::{Placeable, ShelfScene};
use super::settings::ShuffleSettings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthTally {
    pub reached_target: usize,
    /// Stopped early by an overlap.
    pub halted: usize,
}

/// Scale every product of a non-discarded group to `(s, s, shrink_z * s)` and park it
/// at the discard region so the coming placement starts from the same state each run.
/// Every product is made visible again; occlusion hiding only holds for one layout.
///
/// Groups whose shelf is unbound or has no levels cannot be placed: their members are
/// discarded at full target scale instead of staged. Returns the staged count.
pub fn shrink_for_placement<S: ShelfScene + ?Sized>(
    scene: &mut S,
    catalog: &mut SceneCatalog,
    settings: &ShuffleSettings,
) -> usize {
    let SceneCatalog { shelves, groups } = catalog;
    let mut staged = 0;
    for group in groups.iter_mut() {
        for member in &mut group.members {
            scene.set_visible(member.actor, true);
        }
        if group.discarded {
            continue;
        }

        let placeable = shelves
            .iter()
            .any(|s| s.name() == group.shelf_name && s.level_count() > 0);
        if !placeable {
            warn!(
                "Stocking: group '{}' targets shelf '{}' which is unbound or has no levels; discarding {} products",
                group.name,
                group.shelf_name,
                group.members.len()
            );
        }

        for member in &mut group.members {
            let s = member.scale;
            if placeable {
                member.apply_scale(scene, Vec3::new(s, s, settings.shrink_z * s));
                member.stage(scene, settings.discard_region);
                staged += 1;
            } else {
                member.apply_scale(scene, Vec3::splat(s));
                member.discard(scene, settings.discard_region);
            }
        }
    }
    staged
}

/// Faces a grower keeps fixed while its scale changes.
#[derive(Clone, Copy, Debug)]
struct Pin {
    bottom_z: f32,
    front_x: f32,
    center_y: f32,
}

struct Grower {
    group: usize,
    member: usize,
    pin: Pin,
    current: f32,
    done: bool,
}

fn rescale<S: ShelfScene + ?Sized>(scene: &mut S, p: &mut Placeable, pin: Pin, scale: f32) {
    p.apply_scale(scene, Vec3::splat(scale));
    p.align(scene, pin.bottom_z, pin.front_x, pin.center_y);
}

/// Grow every seated product in lockstep rounds. Each round advances each active
/// product by up to `grow_steps_per_round` steps. A product stops when it reaches
/// its target scale or when a step makes it overlap, in which case the step is undone.
pub fn expand_placed<S: ShelfScene + ?Sized>(
    scene: &mut S,
    catalog: &mut SceneCatalog,
    settings: &ShuffleSettings,
) -> GrowthTally {
    let mut growers = Vec::new();
    for (gi, group) in catalog.groups.iter_mut().enumerate() {
        if group.discarded {
            continue;
        }
        for (mi, member) in group.members.iter_mut().enumerate() {
            if !member.on_shelf || member.discarded {
                continue;
            }
            let b = member.bounds(scene);
            let pin = Pin { bottom_z: b.min().z, front_x: b.min().x, center_y: b.origin.y };
            let start = (settings.shrink_z * member.scale).min(member.scale);
            rescale(scene, member, pin, start);
            growers.push(Grower { group: gi, member: mi, pin, current: start, done: false });
        }
    }

    let mut tally = GrowthTally::default();
    let step = settings.grow_step;

    for round in 0..settings.grow_rounds {
        let mut active = 0;
        for g in growers.iter_mut().filter(|g| !g.done) {
            let member = &mut catalog.groups[g.group].members[g.member];
            let target = member.scale;

            for _ in 0..settings.grow_steps_per_round.max(1) {
                let next = if step > 0.0 { (g.current + step).min(target) } else { target };
                rescale(scene, member, g.pin, next);
                if scene.is_overlapping(member.actor) {
                    rescale(scene, member, g.pin, g.current);
                    g.done = true;
                    tally.halted += 1;
                    break;
                }
                g.current = next;
                if next >= target {
                    g.done = true;
                    tally.reached_target += 1;
                    break;
                }
            }
            if !g.done {
                active += 1;
            }
        }
        if active == 0 {
            debug!("Stocking: growth settled after {} rounds", round + 1);
            break;
        }
    }

    // Round budget ran out: whoever is still growing keeps its last clear scale.
    let unfinished = growers.iter().filter(|g| !g.done).count();
    if unfinished > 0 {
        debug!("Stocking: {} products still below target after {} rounds", unfinished, settings.grow_rounds);
        tally.halted += unfinished;
    }
    tally
}
