//! Dioxus UI components for mediadrop.
//!
//! Provides the controlled file uploader, its button and dropzone
//! shells, file previews with the expandable media overlay, and the
//! toast queue that surfaces notices.

mod expandable;
mod preview;
mod shell;
mod toast;
mod uploader;

pub use expandable::ExpandableMedia;
pub use preview::FilePreview;
pub use shell::{ShellVariant, UploadButton, UploadDropzone};
pub use toast::{Toast, ToastHost, ToastQueue, use_toast_provider};
pub use uploader::FileUploader;
