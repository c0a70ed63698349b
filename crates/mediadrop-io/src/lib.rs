//! mediadrop-io: Browser upload transport and Dioxus component library.
//!
//! Sends files to the upload service over XHR (with progress and
//! abort), and provides the uploader widgets: button and dropzone
//! shells, file previews, the expandable media overlay, and a toast
//! queue for notices.

pub mod components;
pub mod hook;
pub mod transport;

pub use components::{
    ExpandableMedia, FilePreview, FileUploader, ShellVariant, ToastHost, ToastQueue,
    UploadButton, UploadDropzone, use_toast_provider,
};
pub use hook::{UseFileUploader, use_file_uploader};
pub use transport::{AbortHandle, InFlightUpload, PendingFile, TransportError, UploadService};
