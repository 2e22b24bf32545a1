// src/stocking/session.rs
//! One shuffle session: owns the whitelist, tunables and the current catalog,
//! and borrows the host scene for as long as it lives.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::catalog::{CatalogError, SceneCatalog};
use super::core::{ShelfScene, ShuffleParams};
use super::growth::{expand_placed, shrink_for_placement, GrowthTally};
use super::lowering::lower_onto_shelves;
use super::occlusion::{estimate_visibility, OcclusionReport};
use super::organize::organize_shelves;
use super::placement::{place_products, PlacementTally};
use super::registry::WhitelistDoc;
use super::settings::ShuffleSettings;

/// Summary of one `run_shuffle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShuffleReport {
    /// Seed the run's generator started from; `None` for a caller-supplied generator.
    pub seed: Option<u64>,
    pub staged: usize,
    pub placement: PlacementTally,
    pub growth: GrowthTally,
    /// Products the organize pass moved (0 when organize is off).
    pub organized: usize,
    pub lowered: usize,
    /// Every product left discarded, configured discards included.
    pub discarded: usize,
}

pub struct ShuffleSession<'s, S: ShelfScene + ?Sized> {
    scene: &'s mut S,
    whitelist: WhitelistDoc,
    settings: ShuffleSettings,
    catalog: SceneCatalog,
}

impl<'s, S: ShelfScene + ?Sized> ShuffleSession<'s, S> {
    pub fn new(scene: &'s mut S, whitelist: WhitelistDoc, settings: ShuffleSettings) -> Self {
        Self { scene, whitelist, settings, catalog: SceneCatalog::default() }
    }

    pub fn scene(&self) -> &S { &*self.scene }
    pub fn scene_mut(&mut self) -> &mut S { &mut *self.scene }
    pub fn settings(&self) -> &ShuffleSettings { &self.settings }
    pub fn settings_mut(&mut self) -> &mut ShuffleSettings { &mut self.settings }
    pub fn catalog(&self) -> &SceneCatalog { &self.catalog }

    /// Swap the whitelist; takes effect on the next read.
    pub fn set_whitelist(&mut self, whitelist: WhitelistDoc) {
        self.whitelist = whitelist;
    }

    /// Rebuild the catalog from scratch. On error the catalog is left empty.
    pub fn read_whitelist(&mut self) -> Result<&SceneCatalog, CatalogError> {
        self.catalog = SceneCatalog::default();
        self.catalog = SceneCatalog::bind(&self.whitelist, &mut *self.scene, self.settings.discard_region)?;
        Ok(&self.catalog)
    }

    /// Full pass with a generator seeded from the settings (or a fresh seed).
    pub fn run_shuffle(&mut self, params: ShuffleParams) -> Result<ShuffleReport, CatalogError> {
        let seed = match self.settings.seed {
            Some(s) => s,
            None => {
                let s = rand::rng().random::<u64>();
                info!("Stocking: no seed configured, drew {}", s);
                s
            }
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut report = self.run_shuffle_with(params, &mut rng)?;
        report.seed = Some(seed);
        Ok(report)
    }

    /// Read whitelist → shrink/stage → place → grow → organize (optional) → lower.
    pub fn run_shuffle_with<R: Rng + ?Sized>(
        &mut self,
        params: ShuffleParams,
        rng: &mut R,
    ) -> Result<ShuffleReport, CatalogError> {
        let params = params.clamped();
        info!(
            "Stocking: shuffle density {:.2}, proximity {:.2}, organize {}, per-group {}",
            params.density, params.proximity, params.organize, params.per_group
        );
        self.read_whitelist()?;

        let scene = &mut *self.scene;
        let catalog = &mut self.catalog;
        let settings = &self.settings;

        let staged = shrink_for_placement(scene, catalog, settings);
        let placement = place_products(scene, catalog, settings, &params, rng);
        let growth = expand_placed(scene, catalog, settings);
        let organized = if params.organize { organize_shelves(scene, catalog, settings) } else { 0 };
        let lowered = lower_onto_shelves(scene, catalog);
        let discarded = catalog.products().filter(|p| p.discarded).count();

        let report = ShuffleReport { seed: None, staged, placement, growth, organized, lowered, discarded };
        info!(
            "Stocking: placed {} of {} (random {}, clustered {}), discarded {}, growth halted {}",
            placement.placed(),
            catalog.product_count(),
            placement.placed_random,
            placement.placed_clustered,
            discarded,
            growth.halted
        );
        Ok(report)
    }

    /// Re-read the whitelist and run the occlusion estimator over the current layout.
    pub fn run_occlusion_pass(&mut self, threshold: f32) -> Result<OcclusionReport, CatalogError> {
        let threshold = threshold.clamp(0.0, 1.0);
        // Products thinned by the last shuffle rebind as live, but they sit at the
        // discard region below the shelf window, so the candidate filter drops them.
        self.read_whitelist()?;
        Ok(estimate_visibility(&mut *self.scene, &self.catalog, &self.settings, threshold))
    }
}
