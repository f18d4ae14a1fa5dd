//! Editing session state
//!
//! One [`Session`] object owns the single shared document slot for the
//! lifetime of an editing session, together with the "has unsaved changes"
//! flag and the two optional timer-driven background actions (autosave to
//! persistence, backup to download). Collaborators that live outside the
//! data core — persistence, notifications, the content view, the download
//! handoff — are injected as trait objects rather than looked up
//! ambiently.
//!
//! The orchestration here and the stage normalizer are the only writers of
//! the slot; readers tolerate it being absent. An import overwrites the
//! slot outright, including on top of whatever a save just flushed.

use crate::error::{DataError, Result};
use crate::model::ProjectDocument;
use crate::stage::{self, PromptKind};
use crate::transfer::{self, Artifact};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Error,
}

/// User-facing message channel (toast, status bar, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotifyLevel);
}

/// Durable session persistence (the browser original used local storage).
pub trait Persistence: Send + Sync {
    fn save(&self, doc: &ProjectDocument) -> Result<()>;
    fn load(&self) -> Option<ProjectDocument>;
}

/// Content view refresh hooks, called when the loaded document changes.
pub trait ContentView: Send + Sync {
    fn on_document_replaced(&self, doc: &ProjectDocument);
    fn on_content_cleared(&self);
}

/// Host handoff for downloadable artifacts.
pub trait DownloadSink: Send + Sync {
    fn offer(&self, artifact: &Artifact) -> Result<()>;
}

/// Session state: the current document plus timer bookkeeping.
pub struct Session {
    document: Mutex<Option<ProjectDocument>>,
    dirty: AtomicBool,
    autosave: Mutex<Option<JoinHandle<()>>>,
    auto_backup: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            document: Mutex::new(None),
            dirty: AtomicBool::new(false),
            autosave: Mutex::new(None),
            auto_backup: Mutex::new(None),
        }
    }
}

impl Session {
    /// Create a session with no document loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the currently loaded document, if any.
    pub fn current(&self) -> Option<ProjectDocument> {
        self.document.lock().unwrap().clone()
    }

    /// Whether a document is loaded.
    pub fn is_loaded(&self) -> bool {
        self.document.lock().unwrap().is_some()
    }

    /// Replace the document slot wholesale. The fresh document starts clean.
    pub fn replace(&self, doc: ProjectDocument) {
        *self.document.lock().unwrap() = Some(doc);
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Record that the loaded document has unsaved edits.
    pub fn mark_changed(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Load the last persisted document into the slot, if one exists.
    pub fn restore(&self, persistence: &dyn Persistence) -> bool {
        match persistence.load() {
            Some(doc) => {
                self.replace(doc);
                true
            }
            None => false,
        }
    }

    /// Import a project file and make it the current document.
    ///
    /// On success the slot is overwritten, the view is refreshed and the
    /// notifier gets a success message. On failure the notifier gets the
    /// error message and the prior session state is left untouched.
    pub async fn import_file(
        &self,
        path: impl AsRef<Path>,
        notifier: &dyn Notifier,
        view: &dyn ContentView,
    ) -> Result<()> {
        let path = path.as_ref();
        match transfer::import_document(path).await {
            Ok(doc) => {
                view.on_document_replaced(&doc);
                view.on_content_cleared();
                self.replace(doc);
                notifier.notify(
                    &format!("Project file loaded: {}", path.display()),
                    NotifyLevel::Success,
                );
                Ok(())
            }
            Err(e) => {
                notifier.notify(&format!("Import failed: {e}"), NotifyLevel::Error);
                Err(e)
            }
        }
    }

    /// Package the current document as a download artifact.
    ///
    /// # Errors
    /// `Validation` when no document is loaded.
    pub fn export_current(&self, filename_hint: Option<&str>) -> Result<Artifact> {
        let guard = self.document.lock().unwrap();
        let doc = guard
            .as_ref()
            .ok_or_else(|| DataError::Validation("no document loaded to export".to_string()))?;
        transfer::export_document(doc, filename_hint)
    }

    /// Export the current document and hand it to the download sink,
    /// reporting the outcome through the notifier.
    pub fn export_to(
        &self,
        sink: &dyn DownloadSink,
        notifier: &dyn Notifier,
        filename_hint: Option<&str>,
    ) -> Result<()> {
        let outcome = self
            .export_current(filename_hint)
            .and_then(|artifact| sink.offer(&artifact).map(|()| artifact));
        match outcome {
            Ok(artifact) => {
                notifier.notify(
                    &format!("Project exported: {}", artifact.filename),
                    NotifyLevel::Success,
                );
                Ok(())
            }
            Err(e) => {
                notifier.notify(&format!("Export failed: {e}"), NotifyLevel::Error);
                Err(e)
            }
        }
    }

    /// Save the current document through the persistence collaborator and
    /// clear the unsaved-changes flag.
    pub fn save_now(&self, persistence: &dyn Persistence) -> Result<()> {
        let guard = self.document.lock().unwrap();
        let doc = guard
            .as_ref()
            .ok_or_else(|| DataError::Validation("no document loaded to save".to_string()))?;
        persistence.save(doc)?;
        self.dirty.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Create a timestamped backup artifact of the current document and
    /// hand it to the download sink.
    pub fn backup_now(&self, sink: &dyn DownloadSink) -> Result<Artifact> {
        let guard = self.document.lock().unwrap();
        let doc = guard
            .as_ref()
            .ok_or_else(|| DataError::Validation("no document loaded to back up".to_string()))?;
        let artifact = transfer::create_backup(doc)?;
        sink.offer(&artifact)?;
        Ok(artifact)
    }

    /// Merge an externally supplied prompt map into the current document.
    ///
    /// # Errors
    /// `MissingData` when no document is loaded or `prompts` is absent.
    pub fn merge_prompts(
        &self,
        kind: PromptKind,
        prompts: Option<&Map<String, Value>>,
    ) -> Result<()> {
        let mut guard = self.document.lock().unwrap();
        let doc = guard.as_mut().ok_or_else(|| {
            DataError::MissingData("no document loaded for prompt merge".to_string())
        })?;
        stage::merge_prompts(doc, kind, prompts)?;
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Arm the periodic autosave timer, replacing any previously armed one.
    ///
    /// Every `minutes` the current document is saved through `persistence`
    /// if the unsaved-changes flag is set; the flag is cleared immediately
    /// after a successful save.
    pub fn set_autosave(self: &Arc<Self>, minutes: u64, persistence: Arc<dyn Persistence>) {
        self.cancel_autosave();
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(minutes * 60));
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                session.flush_if_dirty(persistence.as_ref());
            }
        });
        *self.autosave.lock().unwrap() = Some(handle);
        info!(minutes, "autosave armed");
    }

    /// Cancel the autosave timer, if armed.
    pub fn cancel_autosave(&self) {
        if let Some(handle) = self.autosave.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Arm the periodic backup timer, replacing any previously armed one.
    ///
    /// Every `minutes` a timestamped backup is offered to `sink` if the
    /// unsaved-changes flag is set; the flag is cleared after a successful
    /// handoff.
    pub fn set_auto_backup(self: &Arc<Self>, minutes: u64, sink: Arc<dyn DownloadSink>) {
        self.cancel_auto_backup();
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(minutes * 60));
            interval.tick().await;
            loop {
                interval.tick().await;
                session.backup_if_dirty(sink.as_ref());
            }
        });
        *self.auto_backup.lock().unwrap() = Some(handle);
        info!(minutes, "auto backup armed");
    }

    /// Cancel the backup timer, if armed.
    pub fn cancel_auto_backup(&self) {
        if let Some(handle) = self.auto_backup.lock().unwrap().take() {
            handle.abort();
        }
    }

    fn flush_if_dirty(&self, persistence: &dyn Persistence) {
        if !self.dirty.load(Ordering::SeqCst) {
            return;
        }
        let guard = self.document.lock().unwrap();
        let Some(doc) = guard.as_ref() else { return };
        match persistence.save(doc) {
            Ok(()) => {
                self.dirty.store(false, Ordering::SeqCst);
                info!("autosave flushed session document");
            }
            Err(e) => warn!(error = %e, "autosave failed"),
        }
    }

    fn backup_if_dirty(&self, sink: &dyn DownloadSink) {
        if !self.dirty.load(Ordering::SeqCst) {
            return;
        }
        let guard = self.document.lock().unwrap();
        let Some(doc) = guard.as_ref() else { return };
        let outcome = transfer::create_backup(doc).and_then(|artifact| sink.offer(&artifact));
        match outcome {
            Ok(()) => {
                self.dirty.store(false, Ordering::SeqCst);
                info!("periodic backup created");
            }
            Err(e) => warn!(error = %e, "periodic backup failed"),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Stop timers on shutdown so no task outlives the session.
        self.cancel_autosave();
        self.cancel_auto_backup();
    }
}
