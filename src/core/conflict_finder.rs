use crate::config::AppSettings;
use crate::core::conflict_scan::{self, FileIndex, PartialIndex};
use crate::core::locale_audit::{self, LocaleRules};
use crate::models::conflict::{ConflictReport, LocaleFinding, ScanSnapshot, ScanTarget};
use crate::models::error::SError;
use crate::models::task_status::TaskStatus;
use crate::utils::context::TaskContext;
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, instrument};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinderState {
    Idle,
    Scanning,
    Reporting,
}

#[derive(Debug)]
struct FinderInner {
    state: FinderState,
    last_finished: Option<Instant>,
    runs: u64,
}

/// Runs conflict scans on a worker pool. At most one scan runs at a time, and a
/// trigger arriving too soon after the previous one finished is dropped.
#[derive(Clone)]
pub struct ConflictFinder {
    inner: Arc<Mutex<FinderInner>>,
    pool: Arc<rayon::ThreadPool>,
    debounce: Duration,
    locale: LocaleRules,
    audit_translations: bool,
}

/// Returns the finder to `Idle` and stamps the finish time, even if the scan panics.
struct ScanGuard<'a> {
    inner: &'a Mutex<FinderInner>,
}

impl ScanGuard<'_> {
    fn set_state(&self, state: FinderState) {
        self.inner.lock().state = state;
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.state = FinderState::Idle;
        inner.last_finished = Some(Instant::now());
        inner.runs += 1;
    }
}

impl ConflictFinder {
    pub fn new(debounce: Duration, locale: LocaleRules, audit_translations: bool) -> Result<Self, SError> {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("conflict-scan-{i}"))
            .build()
            .map_err(|e| SError::AsyncRuntimeError(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(Mutex::new(FinderInner {
                state: FinderState::Idle,
                last_finished: None,
                runs: 0,
            })),
            pool: Arc::new(pool),
            debounce,
            locale,
            audit_translations,
        })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, SError> {
        Self::new(
            settings.debounce(),
            LocaleRules::new(&settings.source_locale, &settings.required_locale),
            settings.audit_translations,
        )
    }

    pub fn state(&self) -> FinderState {
        self.inner.lock().state
    }

    /// Number of scans that actually ran.
    pub fn runs(&self) -> u64 {
        self.inner.lock().runs
    }

    fn try_begin(&self) -> Option<ScanGuard<'_>> {
        let mut inner = self.inner.lock();
        if inner.state != FinderState::Idle {
            debug!("Conflict scan already running, ignoring trigger");
            return None;
        }
        if let Some(finished) = inner.last_finished {
            if finished.elapsed() < self.debounce {
                debug!("Conflict scan finished {:?} ago, ignoring trigger", finished.elapsed());
                return None;
            }
        }
        inner.state = FinderState::Scanning;
        Some(ScanGuard { inner: &self.inner })
    }

    /// Scans `snapshot` on the calling thread, fanning the folder walks out to the
    /// pool. Returns `None` when the trigger was ignored.
    #[instrument(skip_all, fields(packages = snapshot.len()))]
    pub fn run(&self, snapshot: ScanSnapshot) -> Option<ConflictReport> {
        let guard = self.try_begin()?;
        let started = Instant::now();
        info!("Searching conflicts in {} mods", snapshot.len());
        report(TaskStatus::Message(format!("Scanning {} mods", snapshot.len())));

        let index = self.scan_files(&snapshot);
        let (red, yellow) = conflict_scan::classify(&index);

        report(TaskStatus::progress(2, 0.0));
        let locale = self.audit_locales(&snapshot, &index);
        report(TaskStatus::progress(2, 100.0));

        guard.set_state(FinderState::Reporting);
        let result = ConflictReport { red, yellow, locale };
        info!(
            "Conflict scan done in {:?}: {} red, {} yellow, {} locale findings",
            started.elapsed(),
            result.red.len(),
            result.yellow.len(),
            result.locale.len()
        );
        Some(result)
    }

    /// Runs [`run`](Self::run) on the blocking pool, streaming progress to `channel`.
    pub async fn spawn(
        &self,
        snapshot: ScanSnapshot,
        channel: UnboundedSender<TaskStatus>,
    ) -> Result<Option<ConflictReport>, SError> {
        let finder = self.clone();
        TaskContext::provide(channel, move || finder.run(snapshot)).await
    }

    fn scan_files(&self, snapshot: &ScanSnapshot) -> FileIndex {
        let total = snapshot.len();
        if total == 0 {
            report(TaskStatus::progress(1, 100.0));
            return FileIndex::default();
        }

        let (tx, rx) = mpsc::channel::<PartialIndex>();
        for target in snapshot.targets().iter().cloned() {
            let tx = tx.clone();
            self.pool.spawn(move || {
                let _ = tx.send(scan_guarded(target, conflict_scan::scan_package));
            });
        }
        drop(tx);

        // Partials are merged here, on the orchestrating thread, as they arrive.
        let mut partials = Vec::with_capacity(total);
        for partial in rx {
            partials.push(partial);
            report(TaskStatus::progress(
                1,
                partials.len() as f64 / total as f64 * 100.0,
            ));
        }

        conflict_scan::merge(partials, snapshot)
    }

    fn audit_locales(
        &self,
        snapshot: &ScanSnapshot,
        index: &FileIndex,
    ) -> BTreeMap<String, Vec<LocaleFinding>> {
        let rules = &self.locale;
        let audit_translations = self.audit_translations;

        let findings: Vec<(String, Vec<LocaleFinding>)> = self.pool.install(|| {
            snapshot
                .targets()
                .par_iter()
                .map(|target: &ScanTarget| {
                    let mut found = Vec::new();
                    if index.localization.contains_key(&target.name) {
                        found.extend(locale_audit::check_required_locale(&target.folder, rules));
                    }
                    if audit_translations {
                        found.extend(locale_audit::audit_translations(&target.folder, rules));
                    }
                    (target.name.clone(), found)
                })
                .collect()
        });

        let mut merged: BTreeMap<String, Vec<LocaleFinding>> = BTreeMap::new();
        for (owner, found) in findings.into_iter().filter(|(_, f)| !f.is_empty()) {
            merged.entry(owner).or_default().extend(found);
        }
        for found in merged.values_mut() {
            found.sort();
            found.dedup();
        }
        merged
    }
}

/// Runs `walk` for one package. A panic yields an empty index for that package.
fn scan_guarded(target: ScanTarget, walk: fn(&ScanTarget) -> PartialIndex) -> PartialIndex {
    panic::catch_unwind(AssertUnwindSafe(|| walk(&target))).unwrap_or_else(|_| {
        error!("Scanning {} panicked, skipping it", target.name);
        PartialIndex {
            owner: target.name.clone(),
            ..Default::default()
        }
    })
}

/// Progress goes to the task channel when one is bound; blocking callers get none.
fn report(status: TaskStatus) {
    match TaskContext::emit(status) {
        Ok(()) | Err(SError::ContextUnprovided) => {}
        Err(e) => debug!("Dropped progress update: {e}"),
    }
}
