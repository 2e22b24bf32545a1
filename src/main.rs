use bevy::prelude::*;

mod setup;
mod input;
mod actions;
mod ui;

use shelfstock::stocking::plugin::StockingSettings;
use shelfstock::stocking::{ShuffleSettings, StockingPlugin};

use actions::{ActionState, ShuffleControls};
use input::{camera_controller, input_mapping_system, stocking_hotkeys};
use ui::{spawn_hud, update_hud};

/// Optional tunables next to the whitelist; missing file keeps the defaults.
const SHUFFLE_SETTINGS_PATH: &str = "assets/stocking/shuffle.ron";

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        // shelf stocking: whitelist asset, settings, request events
        .add_plugins(StockingPlugin)
        .init_resource::<ActionState>()
        .init_resource::<ShuffleControls>()
        .add_systems(PreStartup, load_shuffle_settings)
        // shelves, products, camera, lights
        .add_systems(Startup, (setup::setup, spawn_hud))
        .add_systems(
            Update,
            (input_mapping_system, camera_controller, stocking_hotkeys, update_hud).chain(),
        )
        .run();
}

fn load_shuffle_settings(mut settings: ResMut<StockingSettings>) {
    let text = match std::fs::read_to_string(SHUFFLE_SETTINGS_PATH) {
        Ok(text) => text,
        Err(_) => {
            info!("Demo: no {SHUFFLE_SETTINGS_PATH}, using default shuffle settings");
            return;
        }
    };
    match ShuffleSettings::from_ron_str(&text) {
        Ok(shuffle) => {
            info!("Demo: shuffle settings from {SHUFFLE_SETTINGS_PATH} (seed {:?})", shuffle.seed);
            settings.shuffle = shuffle;
        }
        Err(e) => warn!("Demo: ignoring {SHUFFLE_SETTINGS_PATH}: {e}"),
    }
}
