// src/stocking/placement/cluster.rs
use rand::Rng;

use super::{seat_against_contact, Seated, ShelfFrame};
use crate::stocking::core::{Placeable, ShelfScene};
use crate::stocking::settings::ShuffleSettings;

/// Running placement target shared by the members of one group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub level: usize,
    pub y: f32,
}

impl Anchor {
    pub fn random<R: Rng + ?Sized>(frame: &ShelfFrame, rng: &mut R, margin: f32) -> Self {
        Self { level: frame.random_level(rng), y: frame.random_lateral(rng, margin) }
    }
}

/// Try to place `member` at the running anchor.
///
/// A blocked attempt that still lies within the shelf nudges the anchor sideways by
/// `attempt * (width + U[0, cluster_margin])`, alternating +Y on odd attempts and -Y on
/// even ones, so successive tries fan out further from the first spot. An attempt
/// that falls off the shelf re-rolls the anchor entirely. On success the anchor advances
/// by the product's width so the next member lands beside it.
pub fn place_clustered<S, R>(
    scene: &mut S,
    member: &mut Placeable,
    frame: &ShelfFrame,
    anchor: &mut Anchor,
    settings: &ShuffleSettings,
    rng: &mut R,
) -> Option<Seated>
where
    S: ShelfScene + ?Sized,
    R: Rng + ?Sized,
{
    for attempt in 1..=settings.max_try_times {
        member.align(scene, frame.level_height(anchor.level), frame.entry_x(), anchor.y);
        let bounds = member.bounds(scene);
        let width = bounds.size().y;

        if !frame.contains_lateral(&bounds) {
            *anchor = Anchor::random(frame, rng, settings.end_margin);
            continue;
        }
        if !scene.is_overlapping(member.actor) {
            seat_against_contact(scene, member, frame, settings.push_step);
            let seated = Seated { level: anchor.level, attempts: attempt };
            anchor.y += width;
            return Some(seated);
        }

        let slack = if settings.cluster_margin.is_finite() && settings.cluster_margin > 0.0 {
            rng.random_range(0.0..settings.cluster_margin)
        } else {
            0.0
        };
        let sign = if attempt % 2 == 1 { 1.0 } else { -1.0 };
        anchor.y += sign * attempt as f32 * (width + slack);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stocking::core::{CompactDirection, Shelf};
    use crate::stocking::scene::{product_actor, shelf_actor, LocalBox, MemoryScene, SceneActor};
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn consecutive_members_land_side_by_side() {
        let mut scene = MemoryScene::new();
        let sh = scene.spawn(shelf_actor("shelf", Vec3::ZERO, Vec3::new(0.5, 2.0, 2.0), &[0.5], 0.02));
        let a = scene.spawn(product_actor("a", Vec3::new(-5.0, 0.0, 0.0), Vec3::splat(0.1)));
        let b = scene.spawn(product_actor("b", Vec3::new(-6.0, 0.0, 0.0), Vec3::splat(0.1)));
        let shelf = Shelf {
            object: Placeable::bind("shelf", 1.0, sh, &scene),
            base_heights: vec![0.5],
            offsets: vec![0.0],
            compaction: CompactDirection::TowardMinY,
        };
        let frame = ShelfFrame::new(&shelf, &scene).unwrap();
        let settings = ShuffleSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut anchor = Anchor { level: 0, y: 1.0 };

        let mut pa = Placeable::bind("a", 1.0, a, &scene);
        let mut pb = Placeable::bind("b", 1.0, b, &scene);
        assert!(place_clustered(&mut scene, &mut pa, &frame, &mut anchor, &settings, &mut rng).is_some());
        assert!((anchor.y - 1.1).abs() < 1e-4);
        assert!(place_clustered(&mut scene, &mut pb, &frame, &mut anchor, &settings, &mut rng).is_some());

        let (ba, bb) = (pa.bounds(&scene), pb.bounds(&scene));
        assert!((bb.origin.y - ba.origin.y - 0.1).abs() < 1e-3);
        assert!(!scene.is_overlapping(a) && !scene.is_overlapping(b));
    }

    #[test]
    fn off_shelf_anchor_is_rerolled() {
        let mut scene = MemoryScene::new();
        let sh = scene.spawn(shelf_actor("shelf", Vec3::ZERO, Vec3::new(0.5, 2.0, 2.0), &[0.5], 0.02));
        let p = scene.spawn(product_actor("a", Vec3::new(-5.0, 0.0, 0.0), Vec3::splat(0.1)));
        let shelf = Shelf {
            object: Placeable::bind("shelf", 1.0, sh, &scene),
            base_heights: vec![0.5],
            offsets: vec![0.0],
            compaction: CompactDirection::TowardMinY,
        };
        let frame = ShelfFrame::new(&shelf, &scene).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut anchor = Anchor { level: 0, y: 10.0 };
        let mut member = Placeable::bind("a", 1.0, p, &scene);

        let seated = place_clustered(&mut scene, &mut member, &frame, &mut anchor, &ShuffleSettings::default(), &mut rng).unwrap();
        assert!(seated.attempts >= 2);
        assert!(frame.contains_lateral(&member.bounds(&scene)));
    }

    /// Shelf spanning y in 0..4 with one level at z = 1, plus a blocker covering the
    /// product's footprint for anchors at 1.9, 2.0 and 2.1 but not 2.2.
    fn blocked_at_two(cluster_margin: f32) -> (Option<Seated>, Anchor, f32) {
        let mut scene = MemoryScene::new();
        let sh = scene.spawn(shelf_actor("shelf", Vec3::ZERO, Vec3::new(0.5, 4.0, 2.0), &[0.5], 0.02));
        scene.spawn(SceneActor::new("blocker", Vec3::ZERO).with_box(LocalBox::from_min_max(
            Vec3::new(0.0, 1.86, 1.0),
            Vec3::new(0.4, 2.14, 1.5),
        )));
        let p = scene.spawn(product_actor("a", Vec3::new(-5.0, 0.0, 0.0), Vec3::splat(0.1)));
        let shelf = Shelf {
            object: Placeable::bind("shelf", 1.0, sh, &scene),
            base_heights: vec![0.5],
            offsets: vec![0.0],
            compaction: CompactDirection::TowardMinY,
        };
        let frame = ShelfFrame::new(&shelf, &scene).unwrap();
        let settings = ShuffleSettings { cluster_margin, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut anchor = Anchor { level: 0, y: 2.0 };
        let mut member = Placeable::bind("a", 1.0, p, &scene);

        let seated = place_clustered(&mut scene, &mut member, &frame, &mut anchor, &settings, &mut rng);
        assert!(!scene.is_overlapping(p));
        (seated, anchor, member.bounds(&scene).origin.y)
    }

    #[test]
    fn blocked_anchor_fans_out_alternating_sides() {
        // 2.0 (+0.1) -> 2.1 (-0.2) -> 1.9 (+0.3) -> 2.2, clear on the fourth attempt.
        let (seated, anchor, y) = blocked_at_two(0.0);
        assert_eq!(seated, Some(Seated { level: 0, attempts: 4 }));
        assert!((y - 2.2).abs() < 1e-4, "seated at {y}");
        assert!((anchor.y - 2.3).abs() < 1e-4);
    }

    #[test]
    fn infinite_cluster_margin_adds_no_slack() {
        let (seated, _, y) = blocked_at_two(f32::INFINITY);
        assert_eq!(seated.map(|s| s.attempts), Some(4));
        assert!((y - 2.2).abs() < 1e-4);
    }
}
