use crate::models::error::SError;
use camino::Utf8Path;
use walkdir::WalkDir;

pub struct FileUtils;

impl FileUtils {
    /// Recursively copies a directory tree from source to destination.
    /// Creates all necessary directories and overwrites existing files.
    pub fn copy_recursive(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        std::fs::create_dir_all(dst)?;

        for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
            let src_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                SError::ParseError(format!("Invalid UTF-8 path: {:?}", entry.path()))
            })?;
            let dst_path = dst.join(src_path.strip_prefix(src)?);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dst_path)?;
            } else {
                if let Some(parent) = dst_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(src_path, &dst_path)?;
            }
        }

        Ok(())
    }

    /// Moves every top-level entry of `src` into `dst`, replacing files of the same
    /// name and merging directories. Falls back to copying when a rename crosses devices.
    pub fn merge_into(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        std::fs::create_dir_all(dst)?;

        let mut entries = std::fs::read_dir(src)?
            .map(|entry| {
                entry?.file_name().into_string().map_err(|n| {
                    SError::ParseError(format!("Invalid UTF-8 file name: {n:?}"))
                })
            })
            .collect::<Result<Vec<_>, SError>>()?;
        // Folders first, so a descriptor never lands without its content.
        entries.sort_by_key(|name| !src.join(name).is_dir());

        for name in entries {
            let from = src.join(&name);
            let to = dst.join(&name);

            if from.is_dir() {
                if to.is_dir() || std::fs::rename(&from, &to).is_err() {
                    Self::copy_recursive(&from, &to)?;
                }
            } else if std::fs::rename(&from, &to).is_err() {
                std::fs::copy(&from, &to)?;
            }
        }

        Ok(())
    }

    /// Total size in bytes of every file below `root`. Missing folders are empty.
    pub fn folder_size(root: &Utf8Path) -> u64 {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum()
    }

    /// Renders a byte count the way the mod list shows it: MB, or GB above 99 MB.
    pub fn format_size(bytes: u64) -> String {
        let mb = bytes as f64 / (1024.0 * 1024.0);
        if mb > 99.0 {
            format!("{:.2} GB", mb / 1024.0)
        } else {
            format!("{:.2} MB", mb)
        }
    }
}
