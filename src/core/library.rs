use crate::config::AppSettings;
use crate::core::cache::{LoadOrderFile, WorkingStateCache};
use crate::core::descriptor;
use crate::models::annotation::{AnnotationKey, Colors, Comments, Groups};
use crate::models::conflict::{ScanSnapshot, ScanTarget};
use crate::models::error::SError;
use crate::models::load_order::LoadOrder;
use crate::models::mod_dto::{Mod, ModEntry, ModRef, ModState};
use crate::models::paths::ModsDirRules;
use crate::utils::file::FileUtils;
use crate::utils::json::Json;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// Canonical in-memory state of one mods directory. Not shared across threads;
/// the conflict finder only ever sees a [`ScanSnapshot`].
pub struct Library {
    pub mods_dir: Utf8PathBuf,
    pub load_order_path: Utf8PathBuf,
    pub rules: ModsDirRules,
    pub mods: BTreeMap<ModRef, Mod>,
    pub load_order: LoadOrder,
    pub groups: Groups,
    pub comments: Comments,
    pub colors: Colors,
}

/// Active packages split the way the presentation layer shows them.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct GroupLayout {
    pub ungrouped: Vec<ModEntry>,
    pub groups: Vec<(String, Vec<ModEntry>)>,
}

impl Library {
    pub fn open(settings: &AppSettings) -> Result<Self, SError> {
        Self::open_at(&settings.mods_directory, &settings.load_order_path)
    }

    #[instrument]
    pub fn open_at(mods_dir: &Utf8Path, load_order_path: &Utf8Path) -> Result<Self, SError> {
        std::fs::create_dir_all(mods_dir)?;
        // dunce keeps Windows paths free of the `\\?\` prefix.
        let mods_dir = Utf8PathBuf::from_path_buf(dunce::canonicalize(mods_dir)?)
            .map_err(|p| SError::ParseError(format!("Invalid UTF-8 path: {}", p.display())))?;

        let mut inst = Self {
            rules: ModsDirRules::new(&mods_dir),
            mods_dir,
            load_order_path: load_order_path.to_owned(),
            mods: BTreeMap::new(),
            load_order: LoadOrder::default(),
            groups: Groups::new(),
            comments: Comments::new(),
            colors: Colors::new(),
        };
        inst.load_all();
        Ok(inst)
    }

    /// Rebuilds every in-memory structure from disk.
    pub fn load_all(&mut self) {
        self.comments = read_side_file(&self.rules.comments);
        self.rescan();

        self.load_order =
            WorkingStateCache::load_or_bootstrap(&self.rules.working_state, &self.load_order_path);

        let groups: Groups = read_side_file(&self.rules.groups);
        self.groups = self.sanitize_groups(groups);

        // Keys are resolved once groups and packages are known.
        let raw_colors: BTreeMap<String, String> = read_side_file(&self.rules.colors);
        self.colors = raw_colors
            .into_iter()
            .map(|(raw, color)| {
                let key = AnnotationKey::resolve(&raw, &self.groups, |r| self.mods.contains_key(r));
                (key, color)
            })
            .collect();

        info!(
            "Loaded {} mods, {} in load order, {} groups",
            self.mods.len(),
            self.load_order.enabled_mods.len(),
            self.groups.len()
        );
    }

    /// Re-reads the descriptors only. Load order and groups are left alone, so
    /// freshly discovered packages start out disabled.
    pub fn rescan(&mut self) {
        self.mods = descriptor::scan_mods(&self.mods_dir);
        for (r, m) in self.mods.iter_mut() {
            if let Some(comment) = self.comments.get(r) {
                m.comment = comment.clone();
            }
        }
    }

    /// Drops references to unknown packages and keeps each package in its first group.
    pub(crate) fn sanitize_groups(&self, groups: Groups) -> Groups {
        let mut seen = BTreeSet::new();
        groups
            .into_iter()
            .map(|(name, members)| {
                let members: Vec<ModRef> = members
                    .into_iter()
                    .filter(|r| {
                        let keep = self.mods.contains_key(r) && seen.insert(r.clone());
                        if !keep {
                            debug!("Dropping {r} from group {name}");
                        }
                        keep
                    })
                    .collect();
                (name, members)
            })
            .collect()
    }

    pub fn contains(&self, r: &ModRef) -> bool {
        self.mods.contains_key(r)
    }

    pub fn require(&self, r: &ModRef) -> Result<&Mod, SError> {
        self.mods
            .get(r)
            .ok_or_else(|| SError::ModNotFound(r.to_string()))
    }

    pub fn state_of(&self, r: &ModRef) -> ModState {
        match self.load_order.enabled_mods.flag(r) {
            Some(true) => ModState::Active,
            Some(false) => ModState::TemporarilyDisabled,
            None => ModState::Disabled,
        }
    }

    fn entry(&self, m: &Mod) -> ModEntry {
        ModEntry {
            id: m.id.clone(),
            name: m.name.clone(),
            version: m.version.clone(),
            comment: m.comment.clone(),
            path: m.path.clone(),
            state: self.state_of(&m.path),
        }
    }

    /// Every known package: load order first, then disabled ones by descriptor name.
    pub fn list_mods(&self) -> Vec<ModEntry> {
        let ordered = self
            .load_order
            .enabled_mods
            .refs()
            .filter_map(|r| self.mods.get(r));
        let disabled = self
            .mods
            .values()
            .filter(|m| !self.load_order.enabled_mods.contains(&m.path));

        ordered.chain(disabled).map(|m| self.entry(m)).collect()
    }

    pub fn group_layout(&self) -> GroupLayout {
        let grouped: BTreeSet<&ModRef> = self.groups.values().flatten().collect();

        let ungrouped = self
            .load_order
            .enabled_mods
            .refs()
            .filter(|r| !grouped.contains(r))
            .filter_map(|r| self.mods.get(r))
            .map(|m| self.entry(m))
            .collect();

        let groups = self
            .groups
            .iter()
            .map(|(name, members)| {
                let entries = members
                    .iter()
                    .filter(|r| self.load_order.enabled_mods.contains(r))
                    .filter_map(|r| self.mods.get(r))
                    .map(|m| self.entry(m))
                    .collect();
                (name.clone(), entries)
            })
            .collect();

        GroupLayout { ungrouped, groups }
    }

    pub fn mod_folder(&self, r: &ModRef) -> Utf8PathBuf {
        self.mods_dir.join(r.folder_name())
    }

    pub fn folder_size(&self, r: &ModRef) -> u64 {
        FileUtils::folder_size(&self.mod_folder(r))
    }

    /// Owned copy of the active packages, in load order, for the conflict finder.
    pub fn scan_snapshot(&self) -> ScanSnapshot {
        ScanSnapshot::new(
            self.load_order
                .enabled_mods
                .active()
                .map(|r| ScanTarget {
                    name: r.folder_name().to_string(),
                    folder: self.mod_folder(r),
                })
                .collect(),
        )
    }

    /// Writes the working-state cache and the game's load order file.
    pub fn persist_load_order(&self) {
        if let Err(e) = WorkingStateCache::write(&self.rules.working_state, &self.load_order) {
            warn!("Failed to save working state: {e}");
        }
        if let Err(e) = LoadOrderFile::write(&self.load_order_path, &self.load_order) {
            warn!("Failed to save {}: {e}", self.load_order_path);
        }
    }

    pub fn persist_groups(&self) {
        write_side_file(&self.rules.groups, &self.groups);
    }

    pub fn persist_comments(&self) {
        write_side_file(&self.rules.comments, &self.comments);
    }

    pub fn persist_colors(&self) {
        write_side_file(&self.rules.colors, &self.colors);
    }
}

fn read_side_file<T: serde::de::DeserializeOwned + Default>(path: &Utf8Path) -> T {
    Json::read_or_default(path).unwrap_or_else(|e| {
        warn!("Error loading {path}: {e}");
        T::default()
    })
}

fn write_side_file<T: Serialize>(path: &Utf8Path, data: &T) {
    if let Err(e) = Json::write(path, data) {
        warn!("Failed to save {path}: {e}");
    }
}
