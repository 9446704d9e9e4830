use crate::models::mod_dto::{Mod, ModRef};
use crate::models::paths::DESCRIPTOR_EXTENSION;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Parses descriptor text into attributes. Lines without `=` are skipped; the
/// value is trimmed and loses one pair of surrounding quotes.
pub fn parse_descriptor(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Reads a descriptor file. Never fails: an unreadable file is logged and
/// yields only the injected `path` attribute.
pub fn read_descriptor(path: &Utf8Path) -> BTreeMap<String, String> {
    let mut attributes = match std::fs::read(path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            parse_descriptor(content.trim_start_matches('\u{feff}'))
        }
        Err(e) => {
            warn!("Error reading mod file {path}: {e}");
            BTreeMap::new()
        }
    };

    let file_name = path.file_name().unwrap_or_default().to_string();
    attributes.insert("path".to_string(), file_name);
    attributes
}

/// Lists every `*.mod` file directly inside `mods_dir`, sorted by name.
pub fn find_descriptors(mods_dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    let entries = match mods_dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Unable to read mods directory {mods_dir}: {e}");
            return Vec::new();
        }
    };

    let mut found: Vec<Utf8PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.into_path())
        .filter(|p| p.extension() == Some(DESCRIPTOR_EXTENSION))
        .collect();
    found.sort();
    found
}

/// Scans the mods directory and parses each descriptor into a [`Mod`].
pub fn scan_mods(mods_dir: &Utf8Path) -> BTreeMap<ModRef, Mod> {
    let mods: BTreeMap<ModRef, Mod> = find_descriptors(mods_dir)
        .iter()
        .map(|path| {
            let attributes = read_descriptor(path);
            let r = ModRef::new(attributes.get("path").cloned().unwrap_or_default());
            (r.clone(), Mod::from_attributes(r, attributes))
        })
        .collect();
    debug!("Found {} descriptors in {mods_dir}", mods.len());
    mods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_and_bare_values() {
        let attrs = parse_descriptor(
            "version=\"1.2.3\"\nname = \"Better Barbershop\"\n  supported_version = 1.9.*\n",
        );
        assert_eq!(attrs["version"], "1.2.3");
        assert_eq!(attrs["name"], "Better Barbershop");
        assert_eq!(attrs["supported_version"], "1.9.*");
    }

    #[test]
    fn test_splits_on_first_equals_only() {
        let attrs = parse_descriptor("name=\"a = b\"");
        assert_eq!(attrs["name"], "a = b");
    }

    #[test]
    fn test_lines_without_separator_are_ignored() {
        let attrs = parse_descriptor("tags={\n\t\"Graphics\"\n}\n");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["tags"], "{");
    }

    #[test]
    fn test_path_attribute_overrides_content() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let file = dir.join("123.mod");
        std::fs::write(&file, "path=\"mod/elsewhere\"\nname=\"X\"").unwrap();

        let attrs = read_descriptor(&file);
        assert_eq!(attrs["path"], "123.mod");
        assert_eq!(attrs["name"], "X");
    }

    #[test]
    fn test_file_without_pairs_yields_only_path() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let file = dir.join("empty.mod");
        std::fs::write(&file, "just text\nno pairs here\n").unwrap();

        let attrs = read_descriptor(&file);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["path"], "empty.mod");
    }

    #[test]
    fn test_unreadable_file_is_recovered() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let attrs = read_descriptor(&dir.join("gone.mod"));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["path"], "gone.mod");
    }
}
