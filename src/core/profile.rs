use crate::core::library::Library;
use crate::models::annotation::Groups;
use crate::models::error::SError;
use crate::models::load_order::EnabledSet;
use camino::{Utf8Path, Utf8PathBuf};
use ini::{EscapePolicy, Ini, ParseOption, WriteOption};
use tracing::{info, instrument, warn};

const ENABLED_MODS_KEY: &str = "enabled_mods";
const GROUPS_KEY: &str = "groups";

/// Named snapshots of the load order and groups, one INI section per profile.
/// Values are compact JSON kept verbatim.
pub struct ProfileManager {
    path: Utf8PathBuf,
    ini: Ini,
}

impl ProfileManager {
    /// Opens the profiles file. A missing or unreadable file starts empty.
    pub fn open(path: &Utf8Path) -> Self {
        let ini = if path.exists() {
            Ini::load_from_file_opt(path, Self::parse_option()).unwrap_or_else(|e| {
                warn!("Error loading profiles from {path}: {e}");
                Ini::new()
            })
        } else {
            Ini::new()
        };

        Self {
            path: path.to_owned(),
            ini,
        }
    }

    fn parse_option() -> ParseOption {
        let mut opt = ParseOption::default();
        opt.enabled_quote = false;
        opt.enabled_escape = false;
        opt
    }

    /// Profile names in creation order.
    pub fn names(&self) -> Vec<String> {
        self.ini
            .sections()
            .flatten()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ini.section(Some(name)).is_some()
    }

    /// Stores the current load order and groups under `name`, overwriting in place.
    #[instrument(skip(self, library))]
    pub fn save(&mut self, name: &str, library: &Library) -> Result<(), SError> {
        let enabled = serde_json::to_string(&library.load_order.enabled_mods)?;
        let groups = serde_json::to_string(&library.groups)?;

        self.ini
            .with_section(Some(name))
            .set(ENABLED_MODS_KEY, enabled)
            .set(GROUPS_KEY, groups);
        self.persist();

        info!("Saved profile {name}");
        Ok(())
    }

    /// Replaces the library's load order and groups with the stored ones.
    #[instrument(skip(self, library))]
    pub fn load(&self, name: &str, library: &mut Library) -> Result<(), SError> {
        let section = self
            .ini
            .section(Some(name))
            .ok_or_else(|| SError::ProfileNotFound(name.to_string()))?;

        let enabled: EnabledSet = match section.get(ENABLED_MODS_KEY) {
            Some(raw) => serde_json::from_str(raw)?,
            None => EnabledSet::default(),
        };
        let groups: Groups = match section.get(GROUPS_KEY) {
            Some(raw) => serde_json::from_str(raw)?,
            None => Groups::new(),
        };

        library.load_order.enabled_mods = enabled;
        library.groups = library.sanitize_groups(groups);
        library.persist_load_order();
        library.persist_groups();

        info!("Loaded profile {name}");
        Ok(())
    }

    /// Removes a profile. No-op if it does not exist.
    pub fn delete(&mut self, name: &str) -> Result<(), SError> {
        if self.ini.delete(Some(name)).is_some() {
            self.persist();
            info!("Deleted profile {name}");
        }
        Ok(())
    }

    fn persist(&self) {
        let mut opt = WriteOption::default();
        opt.escape_policy = EscapePolicy::Nothing;

        if let Err(e) = self.ini.write_to_file_opt(&self.path, opt) {
            warn!("Failed to save profiles to {}: {e}", self.path);
        }
    }
}
