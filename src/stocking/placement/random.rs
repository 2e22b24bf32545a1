// src/stocking/placement/random.rs
use rand::Rng;

use super::{seat_against_contact, Seated, ShelfFrame};
use crate::stocking::core::{Placeable, ShelfScene};
use crate::stocking::settings::ShuffleSettings;

/// Independent random search: each attempt draws a fresh level and lateral position.
/// `None` once `max_try_times` attempts all collide; the caller discards.
pub fn place_random<S, R>(
    scene: &mut S,
    member: &mut Placeable,
    frame: &ShelfFrame,
    settings: &ShuffleSettings,
    rng: &mut R,
) -> Option<Seated>
where
    S: ShelfScene + ?Sized,
    R: Rng + ?Sized,
{
    for attempt in 1..=settings.max_try_times {
        let level = frame.random_level(rng);
        let y = frame.random_lateral(rng, settings.end_margin);
        member.align(scene, frame.level_height(level), frame.entry_x(), y);

        if !scene.is_overlapping(member.actor) {
            seat_against_contact(scene, member, frame, settings.push_step);
            return Some(Seated { level, attempts: attempt });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stocking::core::{CompactDirection, Shelf};
    use crate::stocking::scene::{product_actor, shelf_actor, MemoryScene};
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(product: Vec3, levels: &[f32]) -> (MemoryScene, ShelfFrame, Placeable) {
        let mut scene = MemoryScene::new();
        let sh = scene.spawn(shelf_actor("shelf", Vec3::ZERO, Vec3::new(0.5, 2.0, 2.0), levels, 0.02));
        let p = scene.spawn(product_actor("box", Vec3::new(-5.0, 0.0, 0.0), product));
        let shelf = Shelf {
            object: Placeable::bind("shelf", 1.0, sh, &scene),
            base_heights: levels.to_vec(),
            offsets: vec![0.0; levels.len()],
            compaction: CompactDirection::TowardMinY,
        };
        let frame = ShelfFrame::new(&shelf, &scene).unwrap();
        let member = Placeable::bind("box", 1.0, p, &scene);
        (scene, frame, member)
    }

    #[test]
    fn empty_shelf_accepts_first_attempt() {
        let (mut scene, frame, mut member) = setup(Vec3::splat(0.1), &[0.0, 0.5, 1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        // Margin wider than half the box plus the side panel: no draw can clip a panel.
        let settings = ShuffleSettings { end_margin: 0.1, ..Default::default() };
        let seated = place_random(&mut scene, &mut member, &frame, &settings, &mut rng).unwrap();
        assert_eq!(seated.attempts, 1);
        assert!(!scene.is_overlapping(member.actor));
        let b = member.bounds(&scene);
        assert!((b.min().z - frame.level_height(seated.level)).abs() < 1e-4);
    }

    #[test]
    fn product_larger_than_shelf_exhausts() {
        // Wider than the shelf and only interior levels: every attempt hits a side panel.
        let (mut scene, frame, mut member) = setup(Vec3::new(0.1, 3.0, 0.1), &[0.25, 0.5]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let settings = ShuffleSettings { max_try_times: 5, ..Default::default() };
        assert!(place_random(&mut scene, &mut member, &frame, &settings, &mut rng).is_none());
    }
}
