use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Relative file path (with `/` separators) to the folders of every package owning it.
pub type ConflictMap = BTreeMap<String, Vec<String>>;

/// One active package as the scanner sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanTarget {
    /// Owner name used in reports (the content folder name).
    pub name: String,
    pub folder: Utf8PathBuf,
}

/// Immutable, cheaply clonable list of the packages to scan, in load order.
#[derive(Clone, Debug, Default)]
pub struct ScanSnapshot(Arc<[ScanTarget]>);

impl ScanSnapshot {
    pub fn new(targets: Vec<ScanTarget>) -> Self {
        Self(targets.into())
    }

    pub fn targets(&self) -> &[ScanTarget] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load order position of an owner, used to sort owner lists.
    pub fn rank(&self, name: &str) -> usize {
        self.0.iter().position(|t| t.name == name).unwrap_or(usize::MAX)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictTier {
    /// The file name also lives in another directory somewhere in the index.
    Red,
    /// Same path, same directory, different owners.
    Yellow,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocaleIssue {
    /// The required locale directory is absent under the localization root.
    MissingLocale,
    /// A source-locale file has no target-locale counterpart.
    MissingTranslation,
    /// Counterpart exists but the line counts differ.
    LineCountMismatch,
    /// Counterpart exists and is near-identical to the source.
    IdenticalContent,
}

impl LocaleIssue {
    /// Everything but near-identical copies counts as a missing translation in reports.
    pub fn is_missing(&self) -> bool {
        !matches!(self, LocaleIssue::IdenticalContent)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocaleFinding {
    pub issue: LocaleIssue,
    pub file: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ConflictReport {
    pub red: ConflictMap,
    pub yellow: ConflictMap,
    pub locale: BTreeMap<String, Vec<LocaleFinding>>,
}

impl ConflictReport {
    pub fn tier_of(&self, path: &str) -> Option<ConflictTier> {
        if self.red.contains_key(path) {
            Some(ConflictTier::Red)
        } else if self.yellow.contains_key(path) {
            Some(ConflictTier::Yellow)
        } else {
            None
        }
    }

    pub fn is_clean(&self) -> bool {
        self.red.is_empty() && self.yellow.is_empty() && self.locale.is_empty()
    }
}
