#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;
use unmod_keeper::config::AppSettings;
use unmod_keeper::core::library::Library;
use unmod_keeper::models::mod_dto::ModRef;

/// Creates an empty game documents folder with a `mod` directory inside.
pub fn setup_test_env() -> (TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let game_dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    fs::create_dir_all(game_dir.join("mod")).unwrap();
    (tmp, game_dir)
}

pub fn settings(game_dir: &Utf8Path) -> AppSettings {
    AppSettings::for_game_dir(game_dir)
}

/// Writes `<name>.mod` plus a `<name>/` content folder holding `files`.
pub fn create_test_mod(mods_dir: &Utf8Path, name: &str, files: &[&str]) -> ModRef {
    let descriptor = format!(
        "version=\"1.0\"\nname=\"{name}\"\nsupported_version=\"1.12.*\"\npath=\"mod/{name}\"\n"
    );
    fs::write(mods_dir.join(format!("{name}.mod")), descriptor).unwrap();

    let folder = mods_dir.join(name);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("descriptor.mod"), format!("name=\"{name}\"")).unwrap();
    for file in files {
        let path = folder.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("{name}: {file}")).unwrap();
    }

    ModRef::new(format!("{name}.mod"))
}

pub fn open_library(game_dir: &Utf8Path) -> Library {
    Library::open(&settings(game_dir)).expect("Failed to open library")
}

pub fn refs(names: &[&str]) -> Vec<ModRef> {
    names.iter().map(|n| ModRef::new(format!("{n}.mod"))).collect()
}

pub fn order(lib: &Library) -> Vec<ModRef> {
    lib.load_order.enabled_mods.refs().cloned().collect()
}
