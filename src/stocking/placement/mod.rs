// src/stocking/placement/mod.rs
//! Placement engine: density gate, random/clustered search, and contact seating.

use bevy::prelude::*;
use rand::Rng;

use crate::stocking::catalog::SceneCatalog;
use crate::stocking::core::{Bounds, Shelf, ShelfScene, ShuffleParams};
use crate::stocking::settings::ShuffleSettings;

mod cluster;
mod random;
mod seat;

pub use cluster::{place_clustered, Anchor};
pub use random::place_random;
pub use seat::seat_against_contact;

/// Shelf geometry sampled once per shelf per pass.
#[derive(Clone, Debug)]
pub struct ShelfFrame {
    pub bounds: Bounds,
    /// (world height, world offset) per level.
    pub levels: Vec<(f32, f32)>,
}

impl ShelfFrame {
    /// `None` when the shelf declares no levels.
    pub fn new<S: ShelfScene + ?Sized>(shelf: &Shelf, scene: &S) -> Option<Self> {
        if shelf.base_heights.is_empty() {
            return None;
        }
        let bounds = shelf.object.bounds(scene);
        let bottom = bounds.min().z;
        let height = bounds.size().z;
        let levels = shelf
            .base_heights
            .iter()
            .zip(shelf.offsets.iter().chain(std::iter::repeat(&0.0)))
            .map(|(base, off)| (bottom + base * height, off * height))
            .collect();
        Some(Self { bounds, levels })
    }

    #[inline]
    pub fn entry_x(&self) -> f32 { self.bounds.min().x }
    #[inline]
    pub fn back_x(&self) -> f32 { self.bounds.max().x }
    #[inline]
    pub fn level_height(&self, level: usize) -> f32 { self.levels[level].0 }
    #[inline]
    pub fn level_offset(&self, level: usize) -> f32 { self.levels[level].1 }

    pub fn random_level<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.levels.len())
    }

    /// Lateral span with `margin` trimmed off both ends (collapses to the centre if too narrow).
    pub fn lateral_range(&self, margin: f32) -> (f32, f32) {
        let (lo, hi) = (self.bounds.min().y + margin, self.bounds.max().y - margin);
        if lo <= hi { (lo, hi) } else { (self.bounds.origin.y, self.bounds.origin.y) }
    }

    pub fn random_lateral<R: Rng + ?Sized>(&self, rng: &mut R, margin: f32) -> f32 {
        let (lo, hi) = self.lateral_range(margin);
        if lo < hi { rng.random_range(lo..hi) } else { lo }
    }

    /// True if `b` lies inside the shelf's lateral span.
    pub fn contains_lateral(&self, b: &Bounds) -> bool {
        b.min().y >= self.bounds.min().y && b.max().y <= self.bounds.max().y
    }
}

/// Outcome of a successful search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seated {
    pub level: usize,
    pub attempts: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementTally {
    pub placed_random: usize,
    pub placed_clustered: usize,
    /// Rejected by the density gate.
    pub thinned: usize,
    /// No collision-free position within the attempt bound.
    pub exhausted: usize,
}

impl PlacementTally {
    pub fn placed(&self) -> usize { self.placed_random + self.placed_clustered }

    fn absorb(&mut self, other: PlacementTally) {
        self.placed_random += other.placed_random;
        self.placed_clustered += other.placed_clustered;
        self.thinned += other.thinned;
        self.exhausted += other.exhausted;
    }
}

/// Place every product of every non-discarded group onto its assigned shelf.
/// Groups whose shelf is missing from the catalog are left where staging put them.
pub fn place_products<S, R>(
    scene: &mut S,
    catalog: &mut SceneCatalog,
    settings: &ShuffleSettings,
    params: &ShuffleParams,
    rng: &mut R,
) -> PlacementTally
where
    S: ShelfScene + ?Sized,
    R: Rng + ?Sized,
{
    let params = params.clamped();
    let SceneCatalog { shelves, groups } = catalog;
    let mut total = PlacementTally::default();

    for shelf in shelves.iter() {
        let Some(frame) = ShelfFrame::new(shelf, scene) else {
            warn!("Stocking: shelf '{}' has no levels; nothing placed on it", shelf.name());
            continue;
        };
        let mut tally = PlacementTally::default();

        for group in groups.iter_mut().filter(|g| g.shelf_name == shelf.name() && !g.discarded) {
            let mut anchor = Anchor::random(&frame, rng, settings.end_margin);
            let group_kept = !params.per_group || rng.random::<f32>() < params.density;

            for member in group.members.iter_mut() {
                // Density gate: draws are in [0, 1), so density 0 drops all and 1 keeps all.
                let kept = if params.per_group { group_kept } else { rng.random::<f32>() < params.density };
                if !kept {
                    member.discard(scene, settings.discard_region);
                    tally.thinned += 1;
                    continue;
                }

                let clustered = rng.random::<f32>() < params.proximity;
                let seated = if clustered {
                    place_clustered(scene, member, &frame, &mut anchor, settings, rng)
                } else {
                    place_random(scene, member, &frame, settings, rng)
                };

                match seated {
                    Some(s) => {
                        member.on_shelf = true;
                        member.discarded = false;
                        member.shelf_offset = frame.level_offset(s.level);
                        if clustered { tally.placed_clustered += 1 } else { tally.placed_random += 1 }
                    }
                    None => {
                        member.discard(scene, settings.discard_region);
                        tally.exhausted += 1;
                    }
                }
            }
        }

        debug!(
            "Stocking: shelf '{}' placed {} (random {}, clustered {}), thinned {}, exhausted {}",
            shelf.name(),
            tally.placed(),
            tally.placed_random,
            tally.placed_clustered,
            tally.thinned,
            tally.exhausted
        );
        total.absorb(tally);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stocking::core::{CompactDirection, Placeable};
    use crate::stocking::scene::{shelf_actor, MemoryScene};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn frame_for(levels: &[f32], offsets: &[f32]) -> (MemoryScene, ShelfFrame) {
        let mut scene = MemoryScene::new();
        let h = scene.spawn(shelf_actor("shelf", Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.5, 2.0, 2.0), levels, 0.02));
        let shelf = Shelf {
            object: Placeable::bind("shelf", 1.0, h, &scene),
            base_heights: levels.to_vec(),
            offsets: offsets.to_vec(),
            compaction: CompactDirection::TowardMinY,
        };
        let frame = ShelfFrame::new(&shelf, &scene).unwrap();
        (scene, frame)
    }

    #[test]
    fn frame_levels_map_fractions_to_world_heights() {
        let (_, frame) = frame_for(&[0.0, 0.5, 1.0], &[0.0, 0.01, 0.02]);
        assert_eq!(frame.levels.len(), 3);
        assert!((frame.level_height(1) - 1.0).abs() < 1e-5);
        assert!((frame.level_height(2) - 2.0).abs() < 1e-5);
        assert!((frame.level_offset(2) - 0.04).abs() < 1e-5);
        assert!((frame.entry_x() - 1.0).abs() < 1e-6);
        assert!((frame.back_x() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn random_lateral_respects_margin() {
        let (_, frame) = frame_for(&[0.5], &[0.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let y = frame.random_lateral(&mut rng, 0.1);
            assert!((-0.9..=0.9).contains(&y));
        }
        assert_eq!(frame.lateral_range(5.0), (0.0, 0.0));
    }

    #[test]
    fn shelf_without_levels_has_no_frame() {
        let mut scene = MemoryScene::new();
        let h = scene.spawn(shelf_actor("bare", Vec3::ZERO, Vec3::ONE, &[], 0.02));
        let shelf = Shelf {
            object: Placeable::bind("bare", 1.0, h, &scene),
            base_heights: vec![],
            offsets: vec![],
            compaction: CompactDirection::TowardMinY,
        };
        assert!(ShelfFrame::new(&shelf, &scene).is_none());
    }
}
