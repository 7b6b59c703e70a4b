//! Upload-and-classify flow: acquire a file, submit it, show the outcome.
//!
//! The controller never blocks on I/O itself. Reading the preview and sending
//! the request are handed to the host (a worker thread in the GUI), which
//! reports back through [`UploadController::complete_classification`]. Only
//! one request can be in flight: the classify action is disabled while
//! loading and [`UploadController::begin_classification`] refuses to start a
//! second one.

use crate::backend::{Backend, BackendReply};
use crate::error::ClassifyError;
use crate::file::{FileCandidate, SelectedFile, validate};
use crate::render::ResultPanel;
use crate::result::{ClassificationResult, ErrorBody};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What the user currently sees, derived from the screen and the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    FileReady,
    Loading,
    Result,
    Error,
}

/// Visible regions of the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Screen {
    loading: bool,
    classify_enabled: bool,
    error: Option<ClassifyError>,
    drag_active: bool,
    preview_visible: bool,
    result: ResultPanel,
}

impl Screen {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn classify_enabled(&self) -> bool {
        self.classify_enabled
    }

    pub fn error(&self) -> Option<&ClassifyError> {
        self.error.as_ref()
    }

    /// Banner text, when the banner is visible.
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// True while a decoded preview of the current selection is on screen.
    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn result(&self) -> &ResultPanel {
        &self.result
    }

    pub fn show_loading(&mut self) {
        self.loading = true;
        self.classify_enabled = false;
    }

    pub fn hide_loading(&mut self) {
        self.loading = false;
        self.classify_enabled = true;
    }

    pub fn show_error(&mut self, err: ClassifyError) {
        self.error = Some(err);
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    /// Back to the placeholder.
    pub fn hide_result(&mut self) {
        self.result.show_placeholder();
    }
}

/// Drag-and-drop events arriving at the upload area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    /// The first dropped file, if the payload contained any.
    Drop(Option<FileCandidate>),
    /// A dropped file known only by its path.
    DropPath(PathBuf),
}

/// Whether the host should skip its own default handling of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Consumed,
    PassThrough,
}

/// A freshly accepted file whose preview still has to be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub file: SelectedFile,
    /// Selection this preview belongs to; see [`UploadController::set_preview`].
    pub generation: u64,
}

impl PreviewRequest {
    /// Blocking read of the image bytes; run it off the UI thread.
    pub fn load(&self) -> Result<Arc<[u8]>> {
        self.file.read_bytes()
    }
}

/// A classification that has entered the loading state and waits for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub file: SelectedFile,
}

impl PendingRequest {
    pub fn send(&self, backend: &(impl Backend + ?Sized)) -> Result<BackendReply, ClassifyError> {
        backend.predict(&self.file)
    }
}

#[derive(Debug, Default)]
pub struct UploadController {
    selected: Option<SelectedFile>,
    /// Bumped on every accepted file.
    generation: u64,
    pending_preview: Option<PreviewRequest>,
    screen: Screen,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn state(&self) -> UiState {
        if self.screen.loading {
            UiState::Loading
        } else if self.screen.error.is_some() {
            UiState::Error
        } else if self.screen.result.is_showing_content() {
            UiState::Result
        } else if self.selected.is_some() {
            UiState::FileReady
        } else {
            UiState::Idle
        }
    }

    /// Validate and adopt a file from the picker or a drop.
    ///
    /// A rejected file only raises the banner; the previous selection and
    /// the classify action are left as they were.
    pub fn acquire(&mut self, candidate: FileCandidate) -> Result<(), ClassifyError> {
        let name = candidate.name.clone();
        match validate(candidate) {
            Ok(file) => {
                tracing::info!(file = %name, size = file.size(), mime = file.mime_type(), "image selected");
                self.generation += 1;
                self.pending_preview = Some(PreviewRequest {
                    file: file.clone(),
                    generation: self.generation,
                });
                self.selected = Some(file);
                self.screen.classify_enabled = true;
                self.screen.hide_error();
                self.screen.hide_result();
                Ok(())
            }
            Err(err) => {
                tracing::info!(file = %name, "rejected: {err}");
                self.screen.show_error(err.clone());
                Err(err)
            }
        }
    }

    /// Describe a file on disk and acquire it. Unreadable metadata goes to
    /// the banner like any other rejection.
    pub fn acquire_path(&mut self, path: impl AsRef<Path>) -> Result<(), ClassifyError> {
        match FileCandidate::from_path(path) {
            Ok(candidate) => self.acquire(candidate),
            Err(e) => {
                tracing::warn!("{e:#}");
                let err = ClassifyError::Unreadable(format!("{e:#}"));
                self.screen.show_error(err.clone());
                Err(err)
            }
        }
    }

    /// The preview read queued by the latest successful [`Self::acquire`].
    pub fn take_preview_request(&mut self) -> Option<PreviewRequest> {
        self.pending_preview.take()
    }

    /// Report a finished preview read. Returns false, leaving the screen
    /// alone, when a newer file has been selected since the read started;
    /// the host must then discard what it decoded.
    pub fn set_preview(&mut self, generation: u64, shown: bool) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale preview dropped");
            return false;
        }
        self.screen.preview_visible = shown;
        true
    }

    pub fn handle_drag(&mut self, event: DragEvent) -> Disposition {
        match event {
            DragEvent::Enter => {
                self.screen.drag_active = true;
                Disposition::PassThrough
            }
            DragEvent::Over => {
                self.screen.drag_active = true;
                Disposition::Consumed
            }
            DragEvent::Leave => {
                self.screen.drag_active = false;
                Disposition::Consumed
            }
            DragEvent::Drop(file) => {
                self.screen.drag_active = false;
                match file {
                    Some(candidate) => {
                        // the banner already reports a rejection
                        let _ = self.acquire(candidate);
                    }
                    None => tracing::debug!("drop without a file ignored"),
                }
                Disposition::Consumed
            }
            DragEvent::DropPath(path) => {
                self.screen.drag_active = false;
                let _ = self.acquire_path(path);
                Disposition::Consumed
            }
        }
    }

    /// Enter the loading state and hand out the request to send.
    ///
    /// Returns `None` without touching the screen when nothing is selected
    /// or a request is already in flight.
    pub fn begin_classification(&mut self) -> Option<PendingRequest> {
        if self.screen.loading {
            return None;
        }
        let file = self.selected.clone()?;
        tracing::info!(file = file.name(), "classification started");
        self.screen.show_loading();
        self.screen.hide_error();
        self.screen.hide_result();
        Some(PendingRequest { file })
    }

    /// Show the outcome of the in-flight request and leave the loading state.
    pub fn complete_classification(&mut self, outcome: Result<BackendReply, ClassifyError>) {
        match outcome.and_then(interpret_reply) {
            Ok(result) => self.display_result(&result),
            Err(err) => {
                if let ClassifyError::TransportFailure(detail) = &err {
                    tracing::warn!("classification request failed: {detail}");
                }
                self.screen.show_error(err);
            }
        }
        self.screen.hide_loading();
    }

    /// Run a whole classification on the calling thread.
    pub fn classify_blocking(&mut self, backend: &(impl Backend + ?Sized)) {
        if let Some(request) = self.begin_classification() {
            let outcome = request.send(backend);
            self.complete_classification(outcome);
        }
    }

    /// Render a parsed verdict. A `success: false` payload goes to the banner
    /// and leaves the result panel alone.
    pub fn display_result(&mut self, result: &ClassificationResult) {
        if !result.success {
            self.screen.show_error(ClassifyError::server(result.error.clone()));
            return;
        }
        tracing::info!(
            class = %result.predicted_class,
            confidence = result.confidence,
            "classification finished"
        );
        self.screen.result.render(result);
    }
}

// A body that is not JSON counts as a failed request, for any status.
fn interpret_reply(reply: BackendReply) -> Result<ClassificationResult, ClassifyError> {
    if reply.is_success() {
        serde_json::from_slice::<ClassificationResult>(&reply.body)
            .map_err(|e| ClassifyError::transport(format!("malformed reply: {e}")))
    } else {
        let body: ErrorBody = serde_json::from_slice(&reply.body).map_err(|e| {
            ClassifyError::transport(format!("malformed {} reply: {e}", reply.status))
        })?;
        tracing::debug!(status = reply.status, "server rejected the image");
        Err(ClassifyError::server(body.error))
    }
}
