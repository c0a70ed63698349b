//! Endpoint and label registry for each accepted file category.
//!
//! A [`FileTypeRegistry`] is built once by the host application and
//! injected into the widgets. Hosts that talk to a differently named
//! upload service, or tests using fake endpoints, construct their own
//! instead of patching a global table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::detect::{FileKind, detect_file_type};

/// The category of files a widget accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptedFileType {
    /// Images only.
    #[default]
    Image,
    /// Videos only.
    Video,
    /// PDF documents only.
    Pdf,
    /// Any file.
    All,
}

impl AcceptedFileType {
    /// All categories, in registry order.
    pub const ALL: [Self; 4] = [Self::Image, Self::Video, Self::Pdf, Self::All];

    /// Lowercase name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::All => "all",
        }
    }

    /// Value for the native `<input type="file" accept="...">` attribute.
    ///
    /// Empty for [`AcceptedFileType::All`], which means no restriction.
    #[must_use]
    pub const fn input_accept(self) -> &'static str {
        match self {
            Self::Image => "image/*",
            Self::Video => "video/*",
            Self::Pdf => "application/pdf,.pdf",
            Self::All => "",
        }
    }

    /// Client-side pre-check of a picked file's name.
    ///
    /// Rejects only files whose extension is recognised as a *different*
    /// kind. Names without a recognised extension pass, leaving the final
    /// say to the upload service.
    #[must_use]
    pub fn admits(self, file_name: &str) -> bool {
        let Some(expected) = FileKind::from_accept(self) else {
            return true;
        };
        match detect_file_type(file_name) {
            FileKind::Unknown => true,
            detected => detected == expected,
        }
    }
}

impl fmt::Display for AcceptedFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown file category: {0:?} (expected image, video, pdf, or all)")]
pub struct ParseAcceptedFileTypeError(String);

impl FromStr for AcceptedFileType {
    type Err = ParseAcceptedFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseAcceptedFileTypeError(s.to_owned()))
    }
}

/// Icon shown on the uploader shell for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTypeIcon {
    /// Picture frame.
    Image,
    /// Film/camera.
    Video,
    /// Document with text lines.
    Pdf,
    /// Generic file.
    File,
}

/// Static per-category configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypeConfig {
    /// Upload service endpoint used when `max_files <= 1`.
    pub single_endpoint: String,
    /// Upload service endpoint used when `max_files > 1`.
    pub multi_endpoint: String,
    /// Icon for the uploader shell.
    pub icon: FileTypeIcon,
    /// Button label.
    pub default_label: String,
    /// Dropzone headline.
    pub default_dropzone_label: String,
    /// Short description of what the service accepts (types, size
    /// limits). Limits are enforced by the service; this is only a label.
    pub default_allowed_content: String,
}

impl FileTypeConfig {
    /// Endpoint for a widget allowing `max_files` files.
    #[must_use]
    pub fn endpoint(&self, max_files: usize) -> &str {
        if max_files > 1 {
            &self.multi_endpoint
        } else {
            &self.single_endpoint
        }
    }

    fn standard(
        single: &str,
        multi: &str,
        icon: FileTypeIcon,
        label: &str,
        dropzone: &str,
        allowed: &str,
    ) -> Self {
        Self {
            single_endpoint: single.to_owned(),
            multi_endpoint: multi.to_owned(),
            icon,
            default_label: label.to_owned(),
            default_dropzone_label: dropzone.to_owned(),
            default_allowed_content: allowed.to_owned(),
        }
    }
}

/// One [`FileTypeConfig`] per [`AcceptedFileType`].
///
/// Deserializes from a JSON object keyed by category; categories
/// missing from the document keep their default entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTypeRegistry {
    /// Image uploads.
    pub image: FileTypeConfig,
    /// Video uploads.
    pub video: FileTypeConfig,
    /// PDF uploads.
    pub pdf: FileTypeConfig,
    /// Uploads of any type.
    pub all: FileTypeConfig,
}

impl Default for FileTypeRegistry {
    fn default() -> Self {
        Self {
            image: FileTypeConfig::standard(
                "imageUploader",
                "multiImageUploader",
                FileTypeIcon::Image,
                "Upload Image",
                "Drop an image here or click to browse",
                "Images up to 4MB",
            ),
            video: FileTypeConfig::standard(
                "videoUploader",
                "multiVideoUploader",
                FileTypeIcon::Video,
                "Upload Video",
                "Drop a video here or click to browse",
                "Videos up to 64MB",
            ),
            pdf: FileTypeConfig::standard(
                "pdfUploader",
                "multiPdfUploader",
                FileTypeIcon::Pdf,
                "Upload PDF",
                "Drop a PDF here or click to browse",
                "PDFs up to 16MB",
            ),
            all: FileTypeConfig::standard(
                "fileUploader",
                "fileUploader",
                FileTypeIcon::File,
                "Upload File",
                "Drop a file here or click to browse",
                "Images, videos, PDFs and more",
            ),
        }
    }
}

impl FileTypeRegistry {
    /// Configuration for a category.
    #[must_use]
    pub const fn get(&self, accept: AcceptedFileType) -> &FileTypeConfig {
        match accept {
            AcceptedFileType::Image => &self.image,
            AcceptedFileType::Video => &self.video,
            AcceptedFileType::Pdf => &self.pdf,
            AcceptedFileType::All => &self.all,
        }
    }

    /// Endpoint for a category and file limit.
    #[must_use]
    pub fn endpoint_for(&self, accept: AcceptedFileType, max_files: usize) -> &str {
        self.get(accept).endpoint(max_files)
    }
}
