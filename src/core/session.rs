use crate::config::AppSettings;
use crate::core::conflict_finder::ConflictFinder;
use crate::core::library::Library;
use crate::core::profile::ProfileManager;
use crate::models::conflict::ConflictReport;
use crate::models::error::SError;
use crate::models::task_status::TaskStatus;
use std::future::Future;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// Everything the presentation layer talks to for one game install.
pub struct Session {
    pub settings: AppSettings,
    pub library: Library,
    pub profiles: ProfileManager,
    pub finder: ConflictFinder,
}

impl Session {
    pub fn open(settings: AppSettings) -> Result<Self, SError> {
        let library = Library::open(&settings)?;
        let profiles = ProfileManager::open(&settings.profiles_path);
        let finder = ConflictFinder::from_settings(&settings)?;
        info!("Session opened on {}", settings.mods_directory);

        Ok(Self {
            settings,
            library,
            profiles,
            finder,
        })
    }

    pub fn save_profile(&mut self, name: &str) -> Result<(), SError> {
        self.profiles.save(name, &self.library)
    }

    pub fn load_profile(&mut self, name: &str) -> Result<(), SError> {
        self.profiles.load(name, &mut self.library)
    }

    pub fn delete_profile(&mut self, name: &str) -> Result<(), SError> {
        self.profiles.delete(name)
    }

    /// Scans the active packages in the background. The returned future owns a
    /// snapshot, so the library stays free for edits while the scan runs.
    pub fn find_conflicts(
        &self,
        channel: UnboundedSender<TaskStatus>,
    ) -> impl Future<Output = Result<Option<ConflictReport>, SError>> + Send + 'static {
        let snapshot = self.library.scan_snapshot();
        let finder = self.finder.clone();
        async move { finder.spawn(snapshot, channel).await }
    }

    pub fn find_conflicts_blocking(&self) -> Option<ConflictReport> {
        self.finder.run(self.library.scan_snapshot())
    }
}
