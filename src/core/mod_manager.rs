use crate::core::decompression::Decompression;
use crate::core::library::Library;
use crate::models::annotation::{AnnotationKey, Groups};
use crate::models::error::SError;
use crate::models::mod_dto::ModRef;
use camino::Utf8Path;
use tracing::{info, instrument};

/// Activates a package, appending it to the load order if it is not there yet.
pub fn enable_mod(library: &mut Library, r: &ModRef) -> Result<(), SError> {
    library.require(r)?;
    library.load_order.enabled_mods.enable(r.clone());
    library.persist_load_order();
    Ok(())
}

/// Removes a package from the load order entirely. No-op if it is not enabled.
pub fn disable_mod(library: &mut Library, r: &ModRef) -> Result<(), SError> {
    if library.load_order.enabled_mods.remove(r).is_some() {
        library.persist_load_order();
    }
    Ok(())
}

/// Soft toggle that keeps the package's slot in the load order.
pub fn set_temporary_enabled(
    library: &mut Library,
    r: &ModRef,
    active: bool,
) -> Result<(), SError> {
    if !library.load_order.enabled_mods.set_flag(r, active) {
        return Err(SError::ModNotFound(r.to_string()));
    }
    library.persist_load_order();
    Ok(())
}

pub fn reorder(library: &mut Library, sequence: &[ModRef]) -> Result<(), SError> {
    library.load_order.enabled_mods.reorder(sequence);
    library.persist_load_order();
    Ok(())
}

pub fn get_groups(library: &Library) -> &Groups {
    &library.groups
}

/// Replaces every group. Unknown packages are dropped, and a package listed in
/// several groups stays in the first one.
pub fn set_groups(library: &mut Library, groups: Groups) -> Result<(), SError> {
    library.groups = library.sanitize_groups(groups);
    library.persist_groups();
    Ok(())
}

pub fn rename_group(library: &mut Library, old: &str, new: &str) -> Result<(), SError> {
    if old == new {
        return Ok(());
    }
    if !library.groups.contains_key(&old.to_string()) {
        return Err(SError::GroupNotFound(old.to_string()));
    }
    if library.groups.contains_key(&new.to_string()) {
        return Err(SError::DuplicateGroup(new.to_string()));
    }

    library.groups = std::mem::take(&mut library.groups)
        .into_iter()
        .map(|(name, members)| {
            if name == old {
                (new.to_string(), members)
            } else {
                (name, members)
            }
        })
        .collect();
    library.persist_groups();

    if let Some(color) = library.colors.remove(&AnnotationKey::Group(old.to_string())) {
        library.colors.insert(AnnotationKey::Group(new.to_string()), color);
        library.persist_colors();
    }
    Ok(())
}

/// Deletes a group. Its members stay in the load order as ungrouped entries.
pub fn delete_group(library: &mut Library, name: &str) -> Result<(), SError> {
    if library.groups.remove(&name.to_string()).is_some() {
        library.persist_groups();
    }
    if library.colors.remove(&AnnotationKey::Group(name.to_string())).is_some() {
        library.persist_colors();
    }
    Ok(())
}

/// Moves a package into `group` (created at the end if new), or out of every
/// group when `group` is `None`.
pub fn assign_to_group(
    library: &mut Library,
    r: &ModRef,
    group: Option<&str>,
) -> Result<(), SError> {
    library.require(r)?;

    for members in library.groups.values_mut() {
        members.retain(|m| m != r);
    }

    if let Some(name) = group {
        let name = name.to_string();
        match library.groups.get_mut(&name) {
            Some(members) => members.push(r.clone()),
            None => {
                library.groups.insert(name, vec![r.clone()]);
            }
        }
    }

    library.persist_groups();
    Ok(())
}

/// Sets the free-text comment of a package. An empty comment removes it.
pub fn set_comment(library: &mut Library, r: &ModRef, text: &str) -> Result<(), SError> {
    library.require(r)?;

    let text = text.trim();
    if text.is_empty() {
        library.comments.remove(r);
    } else {
        library.comments.insert(r.clone(), text.to_string());
    }
    if let Some(m) = library.mods.get_mut(r) {
        m.comment = text.to_string();
    }

    library.persist_comments();
    Ok(())
}

pub fn set_color(library: &mut Library, key: AnnotationKey, color: &str) -> Result<(), SError> {
    library.colors.insert(key, color.to_string());
    library.persist_colors();
    Ok(())
}

pub fn remove_color(library: &mut Library, key: &AnnotationKey) -> Result<(), SError> {
    if library.colors.remove(key).is_some() {
        library.persist_colors();
    }
    Ok(())
}

/// Extracts an archive into the mods directory and picks up the new descriptors.
/// Returns the packages that were not known before; they start out disabled.
#[instrument(skip(library))]
pub fn install_mod(library: &mut Library, archive: &Utf8Path) -> Result<Vec<ModRef>, SError> {
    Decompression::install(archive, &library.rules.staging, &library.mods_dir)?;

    let before: Vec<ModRef> = library.mods.keys().cloned().collect();
    library.rescan();
    let added: Vec<ModRef> = library
        .mods
        .keys()
        .filter(|r| !before.contains(r))
        .cloned()
        .collect();

    info!("Installed {} new mods from {archive}", added.len());
    Ok(added)
}
