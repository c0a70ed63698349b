//! mediadrop-core: Upload widget logic (sans-IO).
//!
//! Everything the upload widgets decide lives here: which endpoint a
//! widget talks to, what kind of file a URL points at, how upload
//! events turn into a new controlled value, and when the media overlay
//! is open.
//!
//! This crate has **no browser dependencies** -- it consumes plain
//! events and returns [`Effect`]s for the UI layer to apply. All
//! network and DOM interaction lives in `mediadrop-io`.

pub mod config;
pub mod detect;
pub mod notice;
pub mod overlay;
pub mod preview;
pub mod types;
pub mod upload;
pub mod value;

pub use config::{AcceptedFileType, FileTypeConfig, FileTypeIcon, FileTypeRegistry};
pub use detect::{FileKind, detect_file_type, display_name, format_size, mime_type};
pub use notice::{Notice, Severity};
pub use overlay::{OverlayInput, OverlayState};
pub use preview::{PreviewRenderer, PreviewTarget};
pub use types::{UploadError, UploadResponse, UploadedFile};
pub use upload::{Effect, UploadController, UploadTicket, UploaderOptions};
pub use value::{UploadValue, ValueChange};
