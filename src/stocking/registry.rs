// src/stocking/registry.rs
//! Data-driven whitelist of shelves and product groups + asset loader.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::core::CompactDirection;

// ---------- Public plugin to register asset+loader ----------

pub struct WhitelistAssetPlugin;

impl Plugin for WhitelistAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<WhitelistDoc>()
            .register_asset_loader(WhitelistLoader);
    }
}

// ---------- Whitelist document (data form) ----------

/// Top-level document: `{ "Whitelist": { "Shelves": [...], "Products": [...] } }`.
/// Sections are optional at parse time so a structurally incomplete document can
/// still be loaded and then rejected by catalog binding.
#[derive(Asset, TypePath, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WhitelistDoc {
    #[serde(rename = "Whitelist", default)]
    pub whitelist: Option<WhitelistBody>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WhitelistBody {
    #[serde(rename = "Shelves", default)]
    pub shelves: Option<Vec<ShelfDef>>,
    #[serde(rename = "Products", default)]
    pub products: Option<Vec<ProductGroupDef>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShelfDef {
    pub name: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Level heights as 0..1 fractions of the shelf's vertical extent.
    pub shelfbase: Vec<f32>,
    /// Per-level corrections; empty means zero for every level.
    #[serde(default)]
    pub shelfoffset: Vec<f32>,
    #[serde(default)]
    pub compaction: CompactDirection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductGroupDef {
    pub group_name: String,
    pub shelf_name: String,
    #[serde(default)]
    pub discard: bool,
    /// Free text for humans; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberDef {
    pub name: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

impl WhitelistDoc {
    pub fn new(shelves: Vec<ShelfDef>, products: Vec<ProductGroupDef>) -> Self {
        Self {
            whitelist: Some(WhitelistBody { shelves: Some(shelves), products: Some(products) }),
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, WhitelistLoadError> {
        serde_json::from_slice(bytes).map_err(|e| WhitelistLoadError::Json(e.to_string()))
    }

    pub fn from_ron_slice(bytes: &[u8]) -> Result<Self, WhitelistLoadError> {
        ron::de::from_bytes(bytes).map_err(|e| WhitelistLoadError::Ron(e.to_string()))
    }

    /// Pick the parser from the file name (`.ron` or `.json`).
    pub fn from_named_bytes(name: &Path, bytes: &[u8]) -> Result<Self, WhitelistLoadError> {
        match name.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_slice(bytes),
            Some("ron") => Self::from_ron_slice(bytes),
            other => Err(WhitelistLoadError::UnknownFormat(other.unwrap_or_default().to_string())),
        }
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, WhitelistLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_named_bytes(path, &bytes)
    }

    pub fn shelf_count(&self) -> usize {
        self.whitelist.as_ref().and_then(|w| w.shelves.as_ref()).map_or(0, Vec::len)
    }

    pub fn member_count(&self) -> usize {
        self.whitelist
            .as_ref()
            .and_then(|w| w.products.as_ref())
            .map_or(0, |groups| groups.iter().map(|g| g.members.len()).sum())
    }
}

// ---------- Asset loader for `.whitelist.json` / `.whitelist.ron` ----------

#[derive(Default)]
pub struct WhitelistLoader;

impl AssetLoader for WhitelistLoader {
    type Asset = WhitelistDoc;
    type Settings = ();
    type Error = WhitelistLoadError;

    fn extensions(&self) -> &[&str] {
        &["whitelist.json", "whitelist.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let doc = WhitelistDoc::from_named_bytes(load_context.path(), &bytes)?;
        debug!(
            "Whitelist '{}': {} shelves, {} products",
            load_context.path().display(),
            doc.shelf_count(),
            doc.member_count()
        );
        Ok(doc)
    }
}

// ---------- Loader errors ----------

#[derive(thiserror::Error, Debug)]
pub enum WhitelistLoadError {
    #[error("I/O while reading whitelist: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("Unsupported whitelist format '{0}' (expected .json or .ron)")]
    UnknownFormat(String),
}
