//! Upload state hook: binds an [`UploadController`] to a component.
//!
//! [`use_file_uploader`] keeps the controller in a signal so uploading
//! state and progress re-render the owner, remembers the latest
//! controlled value so async completions apply to the current files,
//! and runs the pick-read-send pipeline for the shells.
//!
//! When the owner unmounts, in-flight requests are aborted and the
//! controller is disposed, so late transport events change nothing.

use dioxus::html::FileData;
use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use mediadrop_core::{
    Effect, FileTypeRegistry, Notice, UploadController, UploadError, UploadResponse,
    UploadTicket, UploadValue, UploaderOptions, mime_type,
};

use crate::transport::{AbortHandle, PendingFile, UploadService};

/// Everything from the owner's most recent render.
#[derive(Clone)]
struct Latest {
    options: UploaderOptions,
    value: UploadValue,
    file_names: Option<Vec<String>>,
    endpoint: String,
    service: UploadService,
    on_effects: Callback<Vec<Effect>>,
}

/// Handle returned by [`use_file_uploader`]. Cheap to copy into event
/// handlers and async tasks.
#[derive(Clone, Copy, PartialEq)]
pub struct UseFileUploader {
    controller: Signal<UploadController>,
    latest: CopyValue<Latest>,
    aborts: CopyValue<Vec<(UploadTicket, AbortHandle)>>,
}

/// Create the upload state for one uploader.
///
/// `value` and `file_names` are the parent's controlled state as of
/// this render. Every effect the controller produces is handed to
/// `on_effects`; the caller maps them onto its callbacks.
///
/// The endpoint comes from the [`FileTypeRegistry`] in context and the
/// service location from the [`UploadService`] in context, falling back
/// to their defaults when the host provides none.
pub fn use_file_uploader(
    options: UploaderOptions,
    value: UploadValue,
    file_names: Option<Vec<String>>,
    on_effects: Callback<Vec<Effect>>,
) -> UseFileUploader {
    let service = try_use_context::<UploadService>().unwrap_or_default();
    let registry = try_use_context::<FileTypeRegistry>().unwrap_or_default();
    let snapshot = Latest {
        options,
        value,
        file_names,
        endpoint: registry
            .endpoint_for(options.accept, options.max_files)
            .to_owned(),
        service,
        on_effects,
    };

    let controller = use_signal(|| UploadController::new(options));

    let mut latest = use_hook(|| CopyValue::new(snapshot.clone()));
    latest.set(snapshot);

    let aborts = use_hook(|| CopyValue::new(Vec::new()));

    let uploader = UseFileUploader {
        controller,
        latest,
        aborts,
    };
    use_drop(move || uploader.dispose());
    uploader
}

impl UseFileUploader {
    /// Options as of the owner's last render.
    #[must_use]
    pub fn options(self) -> UploaderOptions {
        self.latest.read().options
    }

    /// Whether an upload is in flight.
    #[must_use]
    pub fn is_uploading(self) -> bool {
        self.controller.read().is_uploading()
    }

    /// Progress of the current upload, 0 to 100.
    #[must_use]
    pub fn upload_progress(self) -> u8 {
        self.controller.read().upload_progress()
    }

    /// How many more files the value can take.
    #[must_use]
    pub fn remaining_capacity(self) -> usize {
        let latest = self.latest.read();
        latest.options.remaining_capacity(&latest.value)
    }

    /// Whether the multi-file "add more" control should be shown.
    #[must_use]
    pub fn can_add_more(self) -> bool {
        let latest = self.latest.read();
        latest.options.can_add_more(&latest.value)
    }

    /// Remove the file at `index` from the value.
    pub fn remove(self, index: usize) {
        self.sync_options();
        let change = {
            let latest = self.latest.read();
            self.controller
                .peek()
                .remove(&latest.value, latest.file_names.as_deref(), index)
        };
        if let Some(change) = change {
            self.emit(vec![Effect::ValueChanged(change)]);
        }
    }

    /// Remove every file from the value.
    pub fn remove_all(self) {
        self.sync_options();
        let change = self.controller.peek().remove_all();
        if let Some(change) = change {
            self.emit(vec![Effect::ValueChanged(change)]);
        }
    }

    /// Upload picked or dropped files.
    ///
    /// Only as many files as the value has room for are sent; the rest
    /// are reported with [`Notice::CapacityReached`]. A file of the
    /// wrong kind fails the whole batch with
    /// [`UploadError::UnsupportedType`] before anything is sent.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; XHR is !Send
    pub async fn upload(self, files: Vec<FileData>) {
        let Some((options, endpoint, service)) = self.target() else {
            return;
        };
        if files.is_empty() {
            return;
        }

        let room = if options.is_multi() {
            options.remaining_capacity(&self.latest.read().value)
        } else {
            1
        };
        if room == 0 {
            debug!(picked = files.len(), "uploader is full, ignoring pick");
            return;
        }
        let skipped = files.len().saturating_sub(room);
        if skipped > 0 {
            self.emit(vec![Effect::Notify(Notice::CapacityReached {
                max_files: options.max_files,
                dropped: skipped,
            })]);
        }
        let files: Vec<FileData> = files.into_iter().take(room).collect();

        let Some(ticket) = self.begin() else {
            return;
        };

        if let Some(name) = files
            .iter()
            .map(FileData::name)
            .find(|name| !options.accept.admits(name))
        {
            self.fail(ticket, UploadError::UnsupportedType(name));
            return;
        }

        let mut pending = Vec::with_capacity(files.len());
        for file in &files {
            let name = file.name();
            match file.read_bytes().await {
                Ok(bytes) => pending.push(PendingFile {
                    content_type: mime_type(&name).map(str::to_owned),
                    name,
                    bytes: bytes.to_vec(),
                }),
                Err(e) => {
                    self.fail(ticket, UploadError::Read(format!("{name}: {e}")));
                    return;
                }
            }
        }

        if !self.is_active(ticket) {
            debug!(ticket = ticket.id(), "uploader went away while reading files");
            return;
        }

        debug!(
            ticket = ticket.id(),
            endpoint = %endpoint,
            files = pending.len(),
            "sending upload"
        );
        let in_flight = match service.start(&endpoint, &pending, move |pct| {
            self.progress(ticket, pct);
        }) {
            Ok(in_flight) => in_flight,
            Err(e) => {
                warn!(ticket = ticket.id(), error = %e, "could not start upload");
                self.fail(ticket, e.into());
                return;
            }
        };

        self.track(ticket, in_flight.abort_handle());
        let outcome = in_flight.finish().await;
        self.untrack(ticket);

        match outcome {
            Ok(responses) => self.complete(ticket, &responses),
            Err(e) => self.fail(ticket, e),
        }
    }

    fn target(self) -> Option<(UploaderOptions, String, UploadService)> {
        let latest = self.latest.try_read().ok()?;
        Some((latest.options, latest.endpoint.clone(), latest.service.clone()))
    }

    /// Bring the controller's options up to the owner's latest render.
    /// Runs from event handlers so render never writes the signal.
    fn sync_options(self) {
        let Ok(options) = self.latest.try_read().map(|latest| latest.options) else {
            return;
        };
        let mut controller = self.controller;
        let stale = controller
            .try_peek()
            .is_ok_and(|controller| *controller.options() != options);
        if stale && let Ok(mut controller) = controller.try_write() {
            controller.set_options(options);
        }
    }

    fn is_active(self, ticket: UploadTicket) -> bool {
        self.controller
            .try_peek()
            .is_ok_and(|controller| controller.is_active(ticket))
    }

    fn begin(self) -> Option<UploadTicket> {
        self.sync_options();
        let mut controller = self.controller;
        let (ticket, effects) = controller.try_write().ok()?.begin();
        if effects.is_empty() {
            return None;
        }
        self.emit(effects);
        Some(ticket)
    }

    fn progress(self, ticket: UploadTicket, percent: u8) {
        let mut controller = self.controller;
        if let Ok(mut controller) = controller.try_write() {
            controller.progress(ticket, percent);
        }
    }

    fn complete(self, ticket: UploadTicket, responses: &[UploadResponse]) {
        self.sync_options();
        let mut controller = self.controller;
        let effects = {
            let (Ok(latest), Ok(mut controller)) = (self.latest.try_read(), controller.try_write())
            else {
                return;
            };
            controller.complete(ticket, &latest.value, latest.file_names.as_deref(), responses)
        };
        self.emit(effects);
    }

    fn fail(self, ticket: UploadTicket, error: UploadError) {
        self.sync_options();
        let mut controller = self.controller;
        let effects = match controller.try_write() {
            Ok(mut controller) => controller.fail(ticket, error),
            Err(_) => return,
        };
        self.emit(effects);
    }

    fn track(self, ticket: UploadTicket, handle: AbortHandle) {
        let mut aborts = self.aborts;
        if let Ok(mut aborts) = aborts.try_write() {
            aborts.push((ticket, handle));
        }
    }

    fn untrack(self, ticket: UploadTicket) {
        let mut aborts = self.aborts;
        if let Ok(mut aborts) = aborts.try_write() {
            aborts.retain(|(t, _)| *t != ticket);
        }
    }

    /// Hand effects to the owner, first folding any new value into the
    /// remembered one so a second completion before the next render
    /// builds on the first.
    fn emit(self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        let mut latest = self.latest;
        let on_effects = {
            let Ok(mut latest) = latest.try_write() else {
                return;
            };
            for effect in &effects {
                if let Effect::ValueChanged(change) = effect {
                    latest.value = change.value.clone();
                    latest.file_names.clone_from(&change.file_names);
                }
            }
            latest.on_effects
        };
        on_effects.call(effects);
    }

    fn dispose(self) {
        let mut aborts = self.aborts;
        if let Ok(mut aborts) = aborts.try_write() {
            for (ticket, handle) in aborts.drain(..) {
                debug!(ticket = ticket.id(), "aborting upload on unmount");
                handle.abort();
            }
        }
        let mut controller = self.controller;
        if let Ok(mut controller) = controller.try_write() {
            controller.dispose();
        }
    }
}
