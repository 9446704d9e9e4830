use crate::models::conflict::{ConflictMap, ScanSnapshot, ScanTarget};
use crate::models::paths::{IGNORED_FILE_NAMES, LOCALIZATION_ROOT};
use camino::Utf8Path;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Files of a single package, relative to its folder and joined with `/`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialIndex {
    pub owner: String,
    pub files: Vec<String>,
    pub localization: Vec<String>,
}

/// Merged view over every scanned package.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileIndex {
    /// Relative path to its owners, in load order.
    pub owners: BTreeMap<String, Vec<String>>,
    /// Owner to its files under the localization root.
    pub localization: BTreeMap<String, Vec<String>>,
}

/// Walks one package folder. A missing or unreadable folder yields an empty index.
pub fn scan_package(target: &ScanTarget) -> PartialIndex {
    let mut partial = PartialIndex {
        owner: target.name.clone(),
        ..Default::default()
    };

    if !target.folder.is_dir() {
        debug!("Skipping {}: no folder at {}", target.name, target.folder);
        return partial;
    }

    for entry in WalkDir::new(&target.folder).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error walking {}: {e}", target.folder);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(rel) = relative_key(&target.folder, entry.path()) else {
            debug!("Skipping non UTF-8 path {}", entry.path().display());
            continue;
        };

        if rel.split('/').next() == Some(LOCALIZATION_ROOT) {
            partial.localization.push(rel.clone());
        }
        partial.files.push(rel);
    }

    partial
}

fn relative_key(root: &Utf8Path, path: &std::path::Path) -> Option<String> {
    let path = Utf8Path::from_path(path)?;
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.components().map(|c| c.as_str()).collect::<Vec<_>>().join("/"))
}

/// Unions partial indexes. The result does not depend on the order they arrive in.
pub fn merge(partials: impl IntoIterator<Item = PartialIndex>, snapshot: &ScanSnapshot) -> FileIndex {
    let mut index = FileIndex::default();

    for partial in partials {
        for file in partial.files {
            index
                .owners
                .entry(file)
                .or_default()
                .push(partial.owner.clone());
        }
        if !partial.localization.is_empty() {
            index
                .localization
                .entry(partial.owner)
                .or_default()
                .extend(partial.localization);
        }
    }

    for owners in index.owners.values_mut() {
        owners.sort_by_key(|o| (snapshot.rank(o), o.clone()));
        owners.dedup();
    }
    for files in index.localization.values_mut() {
        files.sort();
        files.dedup();
    }

    index
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", path),
    }
}

pub fn is_ignored(path: &str) -> bool {
    IGNORED_FILE_NAMES.contains(&split_path(path).1)
}

/// Splits overlapping paths into RED and YELLOW.
///
/// A path owned by several packages is RED when its file name also appears in
/// another directory of the index; every path carrying that name then joins the
/// RED tier. Otherwise the overlap is a plain duplicate and goes to YELLOW.
pub fn classify(index: &FileIndex) -> (ConflictMap, ConflictMap) {
    let mut dirs_by_name: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut paths_by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for path in index.owners.keys() {
        let (dir, name) = split_path(path);
        dirs_by_name.entry(name).or_default().insert(dir);
        paths_by_name.entry(name).or_default().push(path);
    }

    let mut red = ConflictMap::new();
    let mut yellow = ConflictMap::new();

    for (path, owners) in &index.owners {
        if owners.len() < 2 || is_ignored(path) {
            continue;
        }

        let (_, name) = split_path(path);
        if dirs_by_name.get(name).map_or(0, |d| d.len()) > 1 {
            for sibling in paths_by_name.get(name).into_iter().flatten() {
                red.insert(sibling.to_string(), index.owners[*sibling].clone());
            }
        } else {
            yellow.insert(path.clone(), owners.clone());
        }
    }

    (red, yellow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn partial(owner: &str, files: &[&str]) -> PartialIndex {
        PartialIndex {
            owner: owner.into(),
            files: files.iter().map(|f| f.to_string()).collect(),
            localization: vec![],
        }
    }

    fn snapshot(names: &[&str]) -> ScanSnapshot {
        ScanSnapshot::new(
            names
                .iter()
                .map(|n| ScanTarget {
                    name: n.to_string(),
                    folder: Utf8PathBuf::from(n),
                })
                .collect(),
        )
    }

    #[test]
    fn test_same_directory_duplicate_is_yellow() {
        let snap = snapshot(&["a", "b"]);
        let index = merge(
            [partial("b", &["x/y.txt"]), partial("a", &["x/y.txt"])],
            &snap,
        );
        let (red, yellow) = classify(&index);
        assert!(red.is_empty());
        assert_eq!(yellow["x/y.txt"], vec!["a", "b"]);
    }

    #[test]
    fn test_cross_directory_name_is_red() {
        let snap = snapshot(&["a", "b", "c"]);
        let index = merge(
            [
                partial("a", &["x/y.txt"]),
                partial("b", &["x/y.txt"]),
                partial("c", &["z/y.txt"]),
            ],
            &snap,
        );
        let (red, yellow) = classify(&index);
        assert!(yellow.is_empty());
        assert_eq!(red["x/y.txt"], vec!["a", "b"]);
        assert_eq!(red["z/y.txt"], vec!["c"]);
    }

    #[test]
    fn test_ignored_names_and_single_owners() {
        let snap = snapshot(&["a", "b"]);
        let index = merge(
            [
                partial("a", &["descriptor.mod", "thumbnail.png", "only_a.txt"]),
                partial("b", &["descriptor.mod", "thumbnail.png"]),
            ],
            &snap,
        );
        let (red, yellow) = classify(&index);
        assert!(red.is_empty());
        assert!(yellow.is_empty());
    }

    #[test]
    fn test_merge_is_order_independent() {
        let snap = snapshot(&["a", "b", "c"]);
        let forward = merge(
            [partial("a", &["f.txt"]), partial("b", &["f.txt"]), partial("c", &["f.txt"])],
            &snap,
        );
        let backward = merge(
            [partial("c", &["f.txt"]), partial("b", &["f.txt"]), partial("a", &["f.txt"])],
            &snap,
        );
        assert_eq!(forward, backward);
    }
}
