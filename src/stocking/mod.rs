pub mod core;
pub mod settings;
pub mod registry;
pub mod scene;
pub mod catalog;
pub mod placement;
pub mod growth;
pub mod organize;
pub mod lowering;
pub mod occlusion;
pub mod session;
pub mod generator;
pub mod plugin;

pub use catalog::{CatalogError, SceneCatalog};
pub use core::{ActorHandle, Bounds, CompactDirection, Placeable, ProductGroup, Shelf, ShelfScene, ShuffleParams};
pub use generator::{expand_template, WhitelistTemplate};
pub use occlusion::OcclusionReport;
pub use plugin::StockingPlugin;
pub use registry::{WhitelistDoc, WhitelistLoadError};
pub use scene::MemoryScene;
pub use session::{ShuffleReport, ShuffleSession};
pub use settings::ShuffleSettings;
