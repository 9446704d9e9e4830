mod common;

use common::{create_test_mod, open_library, order, refs, settings, setup_test_env};
use unmod_keeper::core::mod_manager;
use unmod_keeper::core::profile::ProfileManager;
use unmod_keeper::core::session::Session;
use unmod_keeper::models::error::SError;
use unmod_keeper::models::mod_dto::ModRef;

#[test]
fn test_save_load_round_trip() {
    let (_tmp, game_dir) = setup_test_env();
    let mods_dir = game_dir.join("mod");
    for name in ["a", "b", "c"] {
        create_test_mod(&mods_dir, name, &[]);
    }
    let profiles_path = game_dir.join("profiles.ini");
    let mut lib = open_library(&game_dir);
    for r in refs(&["c", "a", "b"]) {
        mod_manager::enable_mod(&mut lib, &r).unwrap();
    }
    mod_manager::set_temporary_enabled(&mut lib, &ModRef::new("a.mod"), false).unwrap();
    mod_manager::assign_to_group(&mut lib, &ModRef::new("b.mod"), Some("Core")).unwrap();

    let mut profiles = ProfileManager::open(&profiles_path);
    profiles.save("main", &lib).unwrap();
    let saved_order = lib.load_order.enabled_mods.clone();
    let saved_groups = lib.groups.clone();

    // Wreck the state, then restore it.
    mod_manager::disable_mod(&mut lib, &ModRef::new("c.mod")).unwrap();
    mod_manager::assign_to_group(&mut lib, &ModRef::new("b.mod"), None).unwrap();
    mod_manager::enable_mod(&mut lib, &ModRef::new("c.mod")).unwrap();

    // A fresh manager reads the same file back.
    let profiles = ProfileManager::open(&profiles_path);
    profiles.load("main", &mut lib).unwrap();
    assert_eq!(lib.load_order.enabled_mods, saved_order);
    assert_eq!(lib.groups, saved_groups);
    assert_eq!(order(&lib), refs(&["c", "a", "b"]));

    // Loading persists like any other mutation.
    let reopened = open_library(&game_dir);
    assert_eq!(reopened.load_order.enabled_mods, saved_order);
}

#[test]
fn test_load_missing_profile_fails() {
    let (_tmp, game_dir) = setup_test_env();
    let mut lib = open_library(&game_dir);
    let profiles = ProfileManager::open(&game_dir.join("profiles.ini"));

    assert_eq!(
        profiles.load("nope", &mut lib),
        Err(SError::ProfileNotFound("nope".into()))
    );
}

#[test]
fn test_overwrite_keeps_position_and_recreate_moves_to_end() {
    let (_tmp, game_dir) = setup_test_env();
    let a = create_test_mod(&game_dir.join("mod"), "a", &[]);
    let mut lib = open_library(&game_dir);
    let mut profiles = ProfileManager::open(&game_dir.join("profiles.ini"));

    for name in ["first", "second", "third"] {
        profiles.save(name, &lib).unwrap();
    }

    mod_manager::enable_mod(&mut lib, &a).unwrap();
    profiles.save("first", &lib).unwrap();
    assert_eq!(profiles.names(), vec!["first", "second", "third"]);

    profiles.delete("first").unwrap();
    profiles.delete("first").unwrap();
    profiles.save("first", &lib).unwrap();
    assert_eq!(profiles.names(), vec!["second", "third", "first"]);

    let reread = ProfileManager::open(&game_dir.join("profiles.ini"));
    assert_eq!(reread.names(), vec!["second", "third", "first"]);
    assert!(reread.contains("first"));
}

#[test]
fn test_session_profile_shortcuts() {
    let (_tmp, game_dir) = setup_test_env();
    let a = create_test_mod(&game_dir.join("mod"), "a", &[]);
    let mut session = Session::open(settings(&game_dir)).unwrap();

    mod_manager::enable_mod(&mut session.library, &a).unwrap();
    session.save_profile("with_a").unwrap();
    mod_manager::disable_mod(&mut session.library, &a).unwrap();

    session.load_profile("with_a").unwrap();
    assert!(session.library.load_order.enabled_mods.contains(&a));

    session.delete_profile("with_a").unwrap();
    assert!(session.profiles.names().is_empty());
}
