//! Upload state machine behind every uploader widget.
//!
//! [`UploadController`] turns transport events (begin, progress,
//! complete, fail) and user actions (remove, remove all) into
//! [`Effect`]s. It never owns the controlled value: every operation that
//! changes it takes the parent's current value and returns the new one
//! inside [`Effect::ValueChanged`].
//!
//! # Tickets
//!
//! Each upload gets an [`UploadTicket`] from [`begin`](UploadController::begin).
//! Several uploads may be in flight at once (one per shell instance in
//! multi-file "add more" mode); each completion is applied to the value
//! current at that moment, so files appear in completion order.
//!
//! After [`dispose`](UploadController::dispose) every event is a no-op,
//! which makes completions that arrive after the widget unmounted
//! harmless.

use tracing::{debug, info, warn};

use crate::config::AcceptedFileType;
use crate::detect::format_size;
use crate::notice::Notice;
use crate::types::{UploadError, UploadResponse, UploadedFile};
use crate::value::{UploadValue, ValueChange, normalize};

/// Static configuration of one uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploaderOptions {
    /// Accepted file category.
    pub accept: AcceptedFileType,
    /// Maximum number of files; values above 1 select multi-file mode.
    pub max_files: usize,
    /// Whether the caller handles upload errors itself. When `false`,
    /// failures are surfaced as [`Notice::UploadFailed`] instead.
    pub has_error_handler: bool,
}

impl UploaderOptions {
    /// Options for `accept` with at most `max_files` files (minimum 1).
    #[must_use]
    pub fn new(accept: AcceptedFileType, max_files: usize) -> Self {
        Self {
            accept,
            max_files: max_files.max(1),
            has_error_handler: false,
        }
    }

    /// Set whether the caller supplied an error handler.
    #[must_use]
    pub const fn with_error_handler(mut self, has_error_handler: bool) -> Self {
        self.has_error_handler = has_error_handler;
        self
    }

    /// Whether the widget is in multi-file mode.
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        self.max_files > 1
    }

    /// How many more files fit (0 in single-file mode once a file is set).
    #[must_use]
    pub fn remaining_capacity(&self, current: &UploadValue) -> usize {
        self.max_files
            .saturating_sub(current.urls(self.max_files).len())
    }

    /// Whether the multi-file "add more" control should be offered.
    #[must_use]
    pub fn can_add_more(&self, current: &UploadValue) -> bool {
        self.is_multi() && self.remaining_capacity(current) > 0
    }
}

impl Default for UploaderOptions {
    fn default() -> Self {
        Self::new(AcceptedFileType::default(), 1)
    }
}

/// Handle for one in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    /// Numeric id, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Something the UI layer must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the parent's `on_change`.
    ValueChanged(ValueChange),
    /// Call `on_upload_begin`.
    UploadBegan,
    /// Call `on_upload_complete` for one file.
    FileUploaded(UploadedFile),
    /// Call `on_upload_error`.
    UploadFailed(UploadError),
    /// Show a notice through the host's notification channel.
    Notify(Notice),
}

/// Upload state for one uploader widget.
#[derive(Debug, Clone)]
pub struct UploadController {
    options: UploaderOptions,
    in_flight: Vec<UploadTicket>,
    next_ticket: u64,
    progress: u8,
    disposed: bool,
}

impl UploadController {
    /// A controller with nothing in flight.
    #[must_use]
    pub const fn new(options: UploaderOptions) -> Self {
        Self {
            options,
            in_flight: Vec::new(),
            next_ticket: 0,
            progress: 0,
            disposed: false,
        }
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &UploaderOptions {
        &self.options
    }

    /// Replace the options (e.g. when the parent re-renders with a
    /// different limit). In-flight uploads are unaffected.
    pub const fn set_options(&mut self, options: UploaderOptions) {
        self.options = options;
    }

    /// Whether any upload is in flight.
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Progress of the most recently reported upload, 0 to 100.
    #[must_use]
    pub const fn upload_progress(&self) -> u8 {
        self.progress
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Start an upload.
    ///
    /// Sets the uploading state, resets progress, and emits
    /// [`Effect::UploadBegan`]. A disposed controller hands out a ticket
    /// that every later event ignores.
    pub fn begin(&mut self) -> (UploadTicket, Vec<Effect>) {
        let ticket = UploadTicket(self.next_ticket);
        self.next_ticket += 1;
        if self.disposed {
            return (ticket, Vec::new());
        }
        self.in_flight.push(ticket);
        self.progress = 0;
        debug!(ticket = ticket.id(), accept = %self.options.accept, "upload began");
        (ticket, vec![Effect::UploadBegan])
    }

    /// Record progress for `ticket`, clamped to 100.
    ///
    /// Returns `false` if the ticket is not in flight.
    pub fn progress(&mut self, ticket: UploadTicket, percent: u8) -> bool {
        if !self.in_flight.contains(&ticket) {
            return false;
        }
        self.progress = percent.min(100);
        true
    }

    /// Apply a completed upload to `current`.
    ///
    /// - Single-file mode replaces the value with the first response's
    ///   URL.
    /// - Multi-file mode appends the new files after the existing ones
    ///   and truncates to `max_files`, keeping existing files and
    ///   dropping the newest excess (reported as
    ///   [`Notice::CapacityReached`]).
    ///
    /// Responses without a URL are skipped; if every response lacks one
    /// the upload is treated as failed. An empty batch ends the upload
    /// without changing the value.
    pub fn complete(
        &mut self,
        ticket: UploadTicket,
        current: &UploadValue,
        file_names: Option<&[String]>,
        responses: &[UploadResponse],
    ) -> Vec<Effect> {
        if !self.finish(ticket) {
            debug!(ticket = ticket.id(), "ignoring completion for inactive upload");
            return Vec::new();
        }

        let mut files = Vec::with_capacity(responses.len());
        let mut first_error = None;
        for response in responses {
            match response.to_uploaded_file() {
                Ok(file) => files.push(file),
                Err(e) => {
                    warn!(ticket = ticket.id(), error = %e, "skipping upload response");
                    first_error.get_or_insert(e);
                }
            }
        }

        if files.is_empty() {
            return first_error.map_or_else(Vec::new, |e| self.failure_effects(e));
        }

        info!(
            ticket = ticket.id(),
            count = files.len(),
            size = %format_size(total_size(responses)),
            "upload complete"
        );

        if self.options.is_multi() {
            self.append(current, file_names, files)
        } else {
            Self::replace(files)
        }
    }

    /// Apply a failed upload.
    ///
    /// Emits [`Effect::UploadFailed`] when the caller handles errors,
    /// otherwise [`Notice::UploadFailed`] so the failure is always
    /// visible.
    pub fn fail(&mut self, ticket: UploadTicket, error: UploadError) -> Vec<Effect> {
        if !self.finish(ticket) {
            debug!(ticket = ticket.id(), "ignoring failure for inactive upload");
            return Vec::new();
        }
        warn!(ticket = ticket.id(), error = %error, "upload failed");
        self.failure_effects(error)
    }

    /// Remove the file at `index`.
    ///
    /// Single-file mode clears the value. Multi-file mode splices the
    /// index out of both the URLs and the names, emitting
    /// [`UploadValue::Empty`] when nothing is left. Returns `None` for an
    /// out-of-range index or a disposed controller.
    #[must_use]
    pub fn remove(
        &self,
        current: &UploadValue,
        file_names: Option<&[String]>,
        index: usize,
    ) -> Option<ValueChange> {
        if self.disposed {
            return None;
        }
        if !self.options.is_multi() {
            return Some(ValueChange::value(UploadValue::Empty));
        }

        let (mut urls, mut names) = self.split(current, file_names);
        if index >= urls.len() {
            return None;
        }
        urls.remove(index);
        names.remove(index);

        let value = if urls.is_empty() {
            UploadValue::Empty
        } else {
            UploadValue::Multi(urls)
        };
        Some(ValueChange {
            value,
            file_names: Some(names),
        })
    }

    /// Remove every file: [`UploadValue::Empty`] in single-file mode, an
    /// empty list in multi-file mode.
    #[must_use]
    pub fn remove_all(&self) -> Option<ValueChange> {
        if self.disposed {
            return None;
        }
        Some(if self.options.is_multi() {
            ValueChange {
                value: UploadValue::Multi(Vec::new()),
                file_names: Some(Vec::new()),
            }
        } else {
            ValueChange::value(UploadValue::Empty)
        })
    }

    /// See [`UploaderOptions::remaining_capacity`].
    #[must_use]
    pub fn remaining_capacity(&self, current: &UploadValue) -> usize {
        self.options.remaining_capacity(current)
    }

    /// See [`UploaderOptions::can_add_more`].
    #[must_use]
    pub fn can_add_more(&self, current: &UploadValue) -> bool {
        self.options.can_add_more(current)
    }

    /// Whether `ticket` is still in flight; `false` once it finished or
    /// the controller was disposed.
    #[must_use]
    pub fn is_active(&self, ticket: UploadTicket) -> bool {
        self.in_flight.contains(&ticket)
    }

    /// Mark the widget unmounted. In-flight uploads are forgotten and
    /// every later event returns no effects.
    pub fn dispose(&mut self) {
        if !self.in_flight.is_empty() {
            debug!(in_flight = self.in_flight.len(), "disposing with uploads in flight");
        }
        self.disposed = true;
        self.in_flight.clear();
        self.progress = 0;
    }

    /// Retire `ticket`. Returns `false` if it was not in flight.
    fn finish(&mut self, ticket: UploadTicket) -> bool {
        let Some(pos) = self.in_flight.iter().position(|t| *t == ticket) else {
            return false;
        };
        self.in_flight.remove(pos);
        self.progress = 0;
        true
    }

    fn failure_effects(&self, error: UploadError) -> Vec<Effect> {
        if self.options.has_error_handler {
            vec![Effect::UploadFailed(error)]
        } else {
            vec![Effect::Notify(Notice::UploadFailed {
                message: error.to_string(),
            })]
        }
    }

    /// Current URLs and a names list of the same length.
    fn split(
        &self,
        current: &UploadValue,
        file_names: Option<&[String]>,
    ) -> (Vec<String>, Vec<String>) {
        normalize(current, file_names, self.options.max_files)
            .into_iter()
            .map(|f| (f.url, f.name.unwrap_or_default()))
            .unzip()
    }

    fn replace(files: Vec<UploadedFile>) -> Vec<Effect> {
        let Some(file) = files.into_iter().next() else {
            return Vec::new();
        };
        let change = ValueChange {
            value: UploadValue::Single(file.url.clone()),
            file_names: file.name.clone().map(|n| vec![n]),
        };
        vec![Effect::FileUploaded(file), Effect::ValueChanged(change)]
    }

    fn append(
        &self,
        current: &UploadValue,
        file_names: Option<&[String]>,
        files: Vec<UploadedFile>,
    ) -> Vec<Effect> {
        let max_files = self.options.max_files;
        let (mut urls, mut names) = self.split(current, file_names);
        let uploaded = files.len();
        let room = max_files.saturating_sub(urls.len());

        let mut effects = Vec::with_capacity(uploaded.min(room) + 2);
        for file in files.into_iter().take(room) {
            urls.push(file.url.clone());
            names.push(file.name.clone().unwrap_or_default());
            effects.push(Effect::FileUploaded(file));
        }
        urls.truncate(max_files);
        names.truncate(max_files);

        effects.push(Effect::ValueChanged(ValueChange {
            value: UploadValue::Multi(urls),
            file_names: Some(names),
        }));

        let dropped = uploaded.saturating_sub(room);
        if dropped > 0 {
            warn!(max_files, dropped, "upload batch exceeded file limit");
            effects.push(Effect::Notify(Notice::CapacityReached { max_files, dropped }));
        }
        effects
    }
}

/// Sum of the sizes the service reported, saturating.
fn total_size(responses: &[UploadResponse]) -> u64 {
    responses.iter().map(|r| r.size).fold(0, u64::saturating_add)
}
