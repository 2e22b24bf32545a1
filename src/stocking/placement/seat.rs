// src/stocking/placement/seat.rs
use bevy::prelude::*;

use super::ShelfFrame;
use crate::stocking::core::{Placeable, ShelfScene};

/// Push `member` toward the back of the shelf in `step` increments until it
/// first touches something (or would cross the back face), then back off one step.
/// Returns the number of increments kept.
pub fn seat_against_contact<S: ShelfScene + ?Sized>(
    scene: &mut S,
    member: &mut Placeable,
    frame: &ShelfFrame,
    step: f32,
) -> u32 {
    if step <= 0.0 {
        return 0;
    }
    let depth = (frame.back_x() - member.bounds(scene).min().x).max(0.0);
    let max_steps = (depth / step).ceil() as u32 + 1;

    let mut kept = 0;
    for _ in 0..max_steps {
        let previous = member.position;
        member.move_by(scene, Vec3::X * step);
        let blocked = scene.is_overlapping(member.actor) || member.bounds(scene).max().x > frame.back_x();
        if blocked {
            member.move_to(scene, previous);
            break;
        }
        kept += 1;
    }
    kept
}
