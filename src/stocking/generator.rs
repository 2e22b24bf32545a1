// src/stocking/generator.rs
//! Whitelist generator: expands a compact template (repeat counts, index lists and
//! ranges) into the full whitelist document the catalog binds against.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::core::CompactDirection;
use super::registry::{MemberDef, ProductGroupDef, ShelfDef, WhitelistDoc, WhitelistLoadError};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WhitelistTemplate {
    #[serde(default)]
    pub shelves: Vec<ShelfTemplate>,
    #[serde(default)]
    pub products: Vec<GroupTemplate>,
}

/// One shelf model stamped out `repeat` times as `<Name>_001`, `<Name>_002`, …
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShelfTemplate {
    pub name: String,
    #[serde(default = "one")]
    pub repeat: u32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    pub shelfbase: Vec<f32>,
    #[serde(default)]
    pub shelfoffset: Vec<f32>,
    #[serde(default)]
    pub compaction: CompactDirection,
}

/// Members are `<GroupName>_<NNN>` for every index in `repeat` and every
/// half-open `[from, to)` span in `ranges`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupTemplate {
    pub group_name: String,
    pub shelf_name: String,
    #[serde(default)]
    pub repeat: Vec<u32>,
    #[serde(default)]
    pub ranges: Vec<(u32, u32)>,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub discard: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn one() -> u32 { 1 }
fn unit_scale() -> f32 { 1.0 }

impl GroupTemplate {
    /// Indices in declaration order: explicit list first, then each range.
    pub fn indices(&self) -> Vec<u32> {
        let mut out = self.repeat.clone();
        for &(from, to) in &self.ranges {
            out.extend(from..to);
        }
        out
    }
}

impl WhitelistTemplate {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, WhitelistLoadError> {
        serde_json::from_slice(bytes).map_err(|e| WhitelistLoadError::Json(e.to_string()))
    }

    pub fn from_ron_slice(bytes: &[u8]) -> Result<Self, WhitelistLoadError> {
        ron::de::from_bytes(bytes).map_err(|e| WhitelistLoadError::Ron(e.to_string()))
    }
}

/// Expand `template` into a whitelist. Member order inside each group is shuffled
/// with `rng`, so the same seed always produces the same document.
pub fn expand_template<R: Rng + ?Sized>(template: &WhitelistTemplate, rng: &mut R) -> WhitelistDoc {
    let mut shelves = Vec::new();
    for t in &template.shelves {
        for n in 1..=t.repeat {
            shelves.push(ShelfDef {
                name: format!("{}_{:03}", t.name, n),
                scale: t.scale,
                shelfbase: t.shelfbase.clone(),
                shelfoffset: t.shelfoffset.clone(),
                compaction: t.compaction,
            });
        }
    }

    let mut groups = Vec::with_capacity(template.products.len());
    for t in &template.products {
        let mut indices = t.indices();
        indices.shuffle(rng);
        let members = indices
            .into_iter()
            .map(|i| MemberDef { name: format!("{}_{:03}", t.group_name, i), scale: t.scale })
            .collect();
        groups.push(ProductGroupDef {
            group_name: t.group_name.clone(),
            shelf_name: t.shelf_name.clone(),
            discard: t.discard,
            description: t.description.clone(),
            members,
        });
    }

    let doc = WhitelistDoc::new(shelves, groups);
    debug!("Whitelist generator: {} shelves, {} members", doc.shelf_count(), doc.member_count());
    doc
}
