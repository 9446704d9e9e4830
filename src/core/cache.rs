use crate::models::error::SError;
use crate::models::load_order::LoadOrder;
use crate::utils::json::Json;
use camino::Utf8Path;
use tracing::{debug, info, warn};

/// The working-state cache (`temp_mods.json`): the full ordered mapping of the
/// enabled set, including temporarily disabled entries the game file cannot hold.
pub struct WorkingStateCache;

impl WorkingStateCache {
    /// Loads the cache, or rebuilds it from the game's load order file when the
    /// cache is absent, empty or unreadable. A rebuilt cache is written back.
    pub fn load_or_bootstrap(cache_path: &Utf8Path, load_order_path: &Utf8Path) -> LoadOrder {
        if let Some(order) = Self::read(cache_path) {
            debug!("Loaded working state from {cache_path}");
            return order;
        }

        info!("Working state missing, bootstrapping from {load_order_path}");
        let order = LoadOrderFile::read(load_order_path);
        if let Err(e) = Self::write(cache_path, &order) {
            warn!("Failed to write working state: {e}");
        }
        order
    }

    fn read(cache_path: &Utf8Path) -> Option<LoadOrder> {
        let raw = std::fs::read_to_string(cache_path).ok()?;
        let raw = raw.trim_start_matches('\u{feff}');

        // An empty object means "no cache" rather than "nothing enabled".
        let parsed: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| warn!("Ignoring unreadable working state {cache_path}: {e}"))
            .ok()?;
        if parsed.as_object().map_or(true, |o| o.is_empty()) {
            return None;
        }

        serde_json::from_str::<LoadOrder>(raw).ok()
    }

    pub fn write(cache_path: &Utf8Path, order: &LoadOrder) -> Result<(), SError> {
        Json::write(cache_path, order)
    }
}

/// The game's own load order file (`dlc_load.json`).
pub struct LoadOrderFile;

impl LoadOrderFile {
    /// Reads either shape of the file. Missing or malformed files read as empty.
    pub fn read(path: &Utf8Path) -> LoadOrder {
        Json::read_or_default(path).unwrap_or_else(|e| {
            warn!("Error loading {path}: {e}");
            LoadOrder::default()
        })
    }

    /// Writes the active entries as the flat list the game reads.
    pub fn write(path: &Utf8Path, order: &LoadOrder) -> Result<(), SError> {
        Json::write(path, &order.to_game_load_order())
    }
}
