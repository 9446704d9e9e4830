use camino::Utf8PathBuf;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const APP_NAME: &str = "unmod_keeper";
const GAME_DOCUMENTS: &str = "Paradox Interactive/Crusader Kings III";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub version: u8,
    pub mods_directory: Utf8PathBuf,
    pub load_order_path: Utf8PathBuf,
    pub profiles_path: Utf8PathBuf,
    pub log_directory: Utf8PathBuf,
    pub source_locale: String,
    pub required_locale: String,
    pub debounce_secs: u64,
    pub audit_translations: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let game_dir = UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|d| d.join(GAME_DOCUMENTS)))
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe_path| exe_path.parent().map(|p| p.to_path_buf()))
            })
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        let log_directory = ProjectDirs::from("com", "martes", APP_NAME)
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_local_dir().join("logs")).ok())
            .unwrap_or_else(|| game_dir.join("logs"));

        Self {
            version: 0,
            mods_directory: game_dir.join("mod"),
            load_order_path: game_dir.join("dlc_load.json"),
            profiles_path: game_dir.join("profiles.ini"),
            log_directory,
            source_locale: "english".into(),
            required_locale: "russian".into(),
            debounce_secs: 3,
            audit_translations: true,
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<AppSettings, confy::ConfyError> {
        confy::load(APP_NAME, None)
    }

    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, None, self)
    }

    /// Settings rooted in a single game documents folder, as laid out by the game.
    pub fn for_game_dir(game_dir: &camino::Utf8Path) -> Self {
        Self {
            mods_directory: game_dir.join("mod"),
            load_order_path: game_dir.join("dlc_load.json"),
            profiles_path: game_dir.join("profiles.ini"),
            log_directory: game_dir.join("logs"),
            ..Self::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }
}
