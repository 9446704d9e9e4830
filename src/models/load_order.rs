use crate::models::mod_dto::ModRef;
use crate::utils::ordered_map::OrderedMap;
use serde::de::IgnoredAny;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Ordered set of enabled packages. Iteration order is the load order; the flag
/// is `false` for packages that are temporarily disabled but keep their slot.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "RawEnabledMods")]
pub struct EnabledSet(OrderedMap<ModRef, bool>);

impl EnabledSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, r: &ModRef) -> bool {
        self.0.contains_key(r)
    }

    pub fn flag(&self, r: &ModRef) -> Option<bool> {
        self.0.get(r).copied()
    }

    pub fn position(&self, r: &ModRef) -> Option<usize> {
        self.0.position(r)
    }

    /// Sets the flag to `true`, appending the package if it is not present yet.
    pub fn enable(&mut self, r: ModRef) {
        self.0.insert(r, true);
    }

    pub fn remove(&mut self, r: &ModRef) -> Option<bool> {
        self.0.remove(r)
    }

    /// Flips the flag in place. Returns `false` if the package is not in the set.
    pub fn set_flag(&mut self, r: &ModRef, active: bool) -> bool {
        match self.0.get_mut(r) {
            Some(flag) => {
                *flag = active;
                true
            }
            None => false,
        }
    }

    /// Rebuilds the order from `sequence`, keeping each entry's flag. Unknown
    /// references in `sequence` are skipped; entries it omits are appended in
    /// their previous relative order.
    pub fn reorder(&mut self, sequence: &[ModRef]) {
        let mut next = OrderedMap::new();
        for r in sequence {
            if let Some(flag) = self.0.get(r) {
                next.insert(r.clone(), *flag);
            }
        }
        for (r, flag) in self.0.iter() {
            if !next.contains_key(r) {
                next.insert(r.clone(), *flag);
            }
        }
        self.0 = next;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModRef, bool)> {
        self.0.iter().map(|(r, flag)| (r, *flag))
    }

    pub fn refs(&self) -> impl Iterator<Item = &ModRef> {
        self.0.keys()
    }

    /// Packages the game should actually load, in order.
    pub fn active(&self) -> impl Iterator<Item = &ModRef> {
        self.0.iter().filter(|(_, flag)| **flag).map(|(r, _)| r)
    }
}

impl FromIterator<(ModRef, bool)> for EnabledSet {
    fn from_iter<I: IntoIterator<Item = (ModRef, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for EnabledSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (r, flag) in self.0.iter() {
            map.serialize_entry(&r.load_order_key(), flag)?;
        }
        map.end()
    }
}

/// On-disk shapes of `enabled_mods`: the legacy list or the ordered mapping.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnabledMods {
    List(Vec<String>),
    Map(OrderedMap<String, bool>),
    Other(IgnoredAny),
}

impl From<RawEnabledMods> for EnabledSet {
    fn from(raw: RawEnabledMods) -> Self {
        match raw {
            RawEnabledMods::List(list) => list
                .iter()
                .filter_map(|key| ModRef::from_load_order_key(key))
                .map(|r| (r, true))
                .collect(),
            RawEnabledMods::Map(map) => map
                .iter()
                .filter_map(|(key, flag)| ModRef::from_load_order_key(key).map(|r| (r, *flag)))
                .collect(),
            RawEnabledMods::Other(_) => Self::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDisabledDlcs {
    List(Vec<String>),
    Encoded(String),
    Other(IgnoredAny),
}

impl From<RawDisabledDlcs> for Vec<String> {
    fn from(raw: RawDisabledDlcs) -> Self {
        match raw {
            RawDisabledDlcs::List(list) => list,
            RawDisabledDlcs::Encoded(s) => serde_json::from_str(&s).unwrap_or_default(),
            RawDisabledDlcs::Other(_) => Vec::new(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawLoadOrder {
    #[serde(default)]
    disabled_dlcs: Option<RawDisabledDlcs>,
    #[serde(default)]
    enabled_mods: Option<RawEnabledMods>,
}

/// Canonical load order record. Both the game's load order file and the
/// working-state cache deserialize into this shape; the list form is upgraded
/// to the mapping form here and nowhere else.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "RawLoadOrder")]
pub struct LoadOrder {
    pub disabled_dlcs: Vec<String>,
    pub enabled_mods: EnabledSet,
}

impl From<RawLoadOrder> for LoadOrder {
    fn from(raw: RawLoadOrder) -> Self {
        Self {
            disabled_dlcs: raw.disabled_dlcs.map(Into::into).unwrap_or_default(),
            enabled_mods: raw.enabled_mods.map(Into::into).unwrap_or_default(),
        }
    }
}

/// The projection written for the game: active packages only, as a list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameLoadOrder {
    pub disabled_dlcs: Vec<String>,
    pub enabled_mods: Vec<String>,
}

impl LoadOrder {
    pub fn to_game_load_order(&self) -> GameLoadOrder {
        GameLoadOrder {
            disabled_dlcs: self.disabled_dlcs.clone(),
            enabled_mods: self
                .enabled_mods
                .active()
                .map(ModRef::load_order_key)
                .collect(),
        }
    }
}
