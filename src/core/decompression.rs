use crate::core::descriptor::find_descriptors;
use crate::models::error::SError;
use crate::models::paths::DESCRIPTOR_EXTENSION;
use crate::utils::file::FileUtils;
use camino::Utf8Path;
use std::fs::{self, File};
use std::io;
use tracing::{debug, info, warn};

pub struct Decompression;

impl Decompression {
    pub fn extract(archive_path: &Utf8Path, destination: &Utf8Path) -> Result<(), SError> {
        let file = File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;

            // enclosed_name() rejects entries escaping the destination
            let safe_path = match file.enclosed_name() {
                Some(path) => path.to_owned(),
                None => {
                    warn!("Skipping unsafe archive entry {}", file.name());
                    continue;
                }
            };

            let output_path = destination.as_std_path().join(&safe_path);

            if file.is_dir() {
                fs::create_dir_all(&output_path)?;
            } else {
                if let Some(parent) = output_path.parent() {
                    if !parent.exists() {
                        fs::create_dir_all(parent)?;
                    }
                }

                let mut outfile = File::create(&output_path)?;
                io::copy(&mut file, &mut outfile)?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    let _ = fs::set_permissions(&output_path, fs::Permissions::from_mode(mode));
                }
            }
        }

        Ok(())
    }

    /// Extracts `archive_path` into a private folder under `staging_root` and moves
    /// its contents into `mods_dir`. Nothing reaches `mods_dir` unless the whole
    /// archive extracted and holds at least one descriptor.
    pub fn install(
        archive_path: &Utf8Path,
        staging_root: &Utf8Path,
        mods_dir: &Utf8Path,
    ) -> Result<(), SError> {
        let stage = staging_root.join(uuid::Uuid::new_v4().to_string());
        debug!("Staging {archive_path} in {stage}");

        let result = Self::extract(archive_path, &stage)
            .map_err(|e| SError::ArchiveError(format!("{archive_path}: {e}")))
            .and_then(|_| Self::ensure_descriptor(archive_path, &stage))
            .and_then(|_| FileUtils::merge_into(&stage, mods_dir));

        if stage.exists() {
            if let Err(e) = fs::remove_dir_all(&stage) {
                warn!("Failed to clean staging folder {stage}: {e}");
            }
        }
        // Only removes the staging root once no other install uses it.
        let _ = fs::remove_dir(staging_root);

        if result.is_ok() {
            info!("Installed {archive_path} into {mods_dir}");
        }
        result
    }

    fn ensure_descriptor(archive_path: &Utf8Path, stage: &Utf8Path) -> Result<(), SError> {
        if find_descriptors(stage).is_empty() {
            return Err(SError::ArchiveError(format!(
                "{archive_path} contains no .{DESCRIPTOR_EXTENSION} descriptor"
            )));
        }
        Ok(())
    }
}
