// src/stocking/catalog.rs
//! Binds a whitelist document to actors of the host scene.

use bevy::prelude::*;

use super::core::{Placeable, ProductGroup, Shelf, ShelfScene};
use super::registry::{ShelfDef, WhitelistDoc};

/// Shelves and product groups resolved against the scene for one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneCatalog {
    pub shelves: Vec<Shelf>,
    pub groups: Vec<ProductGroup>,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    #[error("whitelist has no 'Whitelist' root object")]
    MissingRoot,
    #[error("whitelist has no 'Shelves' section")]
    MissingShelves,
    #[error("whitelist has no 'Products' section")]
    MissingProducts,
}

impl SceneCatalog {
    /// Resolve every whitelist entry to a scene actor (exact name, first match).
    /// Unresolved entries are skipped. Members of groups flagged `Discard` are
    /// parked at `discard_region` immediately.
    pub fn bind<S: ShelfScene + ?Sized>(
        doc: &WhitelistDoc,
        scene: &mut S,
        discard_region: Vec3,
    ) -> Result<Self, CatalogError> {
        let body = doc.whitelist.as_ref().ok_or(CatalogError::MissingRoot)?;
        let shelf_defs = body.shelves.as_ref().ok_or(CatalogError::MissingShelves)?;
        let group_defs = body.products.as_ref().ok_or(CatalogError::MissingProducts)?;

        info!("Stocking: reading whitelist ({} shelves, {} groups)", shelf_defs.len(), group_defs.len());

        let mut catalog = SceneCatalog::default();

        for def in shelf_defs {
            let Some(actor) = scene.resolve_by_name(&def.name) else {
                debug!("Stocking: found 0 objects for shelf '{}'", def.name);
                continue;
            };
            let Some(offsets) = level_offsets(def) else {
                warn!(
                    "Stocking: shelf '{}' has {} base heights but {} offsets; skipped",
                    def.name,
                    def.shelfbase.len(),
                    def.shelfoffset.len()
                );
                continue;
            };
            debug!("Stocking: shelf '{}' -> {:?} with {} levels", def.name, actor, def.shelfbase.len());
            catalog.shelves.push(Shelf {
                object: Placeable::bind(&def.name, def.scale, actor, scene),
                base_heights: def.shelfbase.clone(),
                offsets,
                compaction: def.compaction,
            });
        }

        for def in group_defs {
            let mut members = Vec::with_capacity(def.members.len());
            for m in &def.members {
                match scene.resolve_by_name(&m.name) {
                    Some(actor) => members.push(Placeable::bind(&m.name, m.scale, actor, scene)),
                    None => debug!("Stocking: found 0 objects for product '{}'", m.name),
                }
            }

            let mut group = ProductGroup {
                name: def.group_name.clone(),
                shelf_name: def.shelf_name.clone(),
                members,
                discarded: def.discard,
            };
            if group.discarded {
                for member in &mut group.members {
                    member.discard(scene, discard_region);
                }
            }
            catalog.groups.push(group);
        }

        info!(
            "Stocking: collected {} shelves and {} products in {} groups",
            catalog.shelves.len(),
            catalog.product_count(),
            catalog.groups.len()
        );
        Ok(catalog)
    }

    pub fn shelf(&self, name: &str) -> Option<&Shelf> {
        self.shelves.iter().find(|s| s.name() == name)
    }

    pub fn groups_on<'a>(&'a self, shelf_name: &'a str) -> impl Iterator<Item = &'a ProductGroup> + 'a {
        self.groups.iter().filter(move |g| g.shelf_name == shelf_name)
    }

    pub fn products(&self) -> impl Iterator<Item = &Placeable> {
        self.groups.iter().flat_map(|g| g.members.iter())
    }

    pub fn product(&self, name: &str) -> Option<&Placeable> {
        self.products().find(|p| p.name == name)
    }

    pub fn product_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

/// Offsets paired with the shelf's levels; `None` if the lengths disagree.
fn level_offsets(def: &ShelfDef) -> Option<Vec<f32>> {
    if def.shelfoffset.is_empty() {
        return Some(vec![0.0; def.shelfbase.len()]);
    }
    (def.shelfoffset.len() == def.shelfbase.len()).then(|| def.shelfoffset.clone())
}
