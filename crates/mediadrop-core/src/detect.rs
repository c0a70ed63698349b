//! File-type detection from URLs and file names.
//!
//! Detection is purely lexical: the extension of the last path segment
//! is matched case-insensitively against fixed lists. No network or
//! filesystem access happens here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AcceptedFileType;

/// Extensions recognised as images.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "avif",
];

/// Extensions recognised as videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv", "m4v", "ogv"];

/// Extensions recognised as PDF documents.
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// The kind of media a file is, as far as previews are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Raster or vector image.
    Image,
    /// Video container.
    Video,
    /// PDF document.
    Pdf,
    /// Anything else.
    #[default]
    Unknown,
}

impl FileKind {
    /// All kinds, in preview-dispatch order.
    pub const ALL: [Self; 4] = [Self::Image, Self::Video, Self::Pdf, Self::Unknown];

    /// The kind implied by a widget restricted to one category.
    ///
    /// Returns `None` for [`AcceptedFileType::All`], where the kind must
    /// be detected per file.
    #[must_use]
    pub const fn from_accept(accept: AcceptedFileType) -> Option<Self> {
        match accept {
            AcceptedFileType::Image => Some(Self::Image),
            AcceptedFileType::Video => Some(Self::Video),
            AcceptedFileType::Pdf => Some(Self::Pdf),
            AcceptedFileType::All => None,
        }
    }

    /// Resolve the kind of `url` for a widget accepting `accept`.
    ///
    /// Restricted widgets trust their category, since upload service
    /// URLs often carry no extension at all.
    #[must_use]
    pub fn resolve(accept: AcceptedFileType, url: &str) -> Self {
        Self::from_accept(accept).unwrap_or_else(|| detect_file_type(url))
    }

    /// Whether the overlay can show this kind full-size.
    #[must_use]
    pub const fn is_expandable(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }

    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer a file's kind from a URL or file name.
///
/// Query strings and fragments are ignored. Empty input is
/// [`FileKind::Unknown`].
#[must_use]
pub fn detect_file_type(url: &str) -> FileKind {
    let Some(ext) = extension(url) else {
        return FileKind::Unknown;
    };
    let matches = |list: &[&str]| list.iter().any(|e| e.eq_ignore_ascii_case(ext));

    if matches(IMAGE_EXTENSIONS) {
        FileKind::Image
    } else if matches(VIDEO_EXTENSIONS) {
        FileKind::Video
    } else if matches(PDF_EXTENSIONS) {
        FileKind::Pdf
    } else {
        FileKind::Unknown
    }
}

/// MIME type for a file name, for the multipart part sent to the
/// upload service. `None` for extensions outside the known lists.
#[must_use]
pub fn mime_type(file_name: &str) -> Option<&'static str> {
    let ext = extension(file_name)?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "ogv" => "video/ogg",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

/// Strip the query string and fragment from a URL.
fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Last path segment of a URL, ignoring a trailing slash.
fn last_segment(url: &str) -> &str {
    let path = strip_query(url).trim_end_matches('/');
    path.rsplit_once('/').map_or(path, |(_, seg)| seg)
}

/// Extension of the last path segment, without the dot.
fn extension(url: &str) -> Option<&str> {
    last_segment(url)
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// File name to display for a URL that has no explicit name.
///
/// Takes the last path segment, percent-decoded when it decodes to valid
/// UTF-8. Falls back to the whole input when there is no segment.
#[must_use]
pub fn display_name(url: &str) -> String {
    let segment = last_segment(url);
    if segment.is_empty() {
        return url.to_owned();
    }
    percent_encoding::percent_decode_str(segment)
        .decode_utf8()
        .map_or_else(|_| segment.to_owned(), |s| s.into_owned())
}

/// Human-readable byte count, e.g. `"1.5 MB"`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_image_extension_is_image() {
        for ext in IMAGE_EXTENSIONS {
            let url = format!("https://cdn.example/a/photo.{ext}");
            assert_eq!(detect_file_type(&url), FileKind::Image, "{url}");
            let upper = format!("photo.{}", ext.to_uppercase());
            assert_eq!(detect_file_type(&upper), FileKind::Image, "{upper}");
        }
    }

    #[test]
    fn every_video_extension_is_video() {
        for ext in VIDEO_EXTENSIONS {
            let url = format!("https://cdn.example/clip.{ext}?token=abc");
            assert_eq!(detect_file_type(&url), FileKind::Video, "{url}");
        }
    }

    #[test]
    fn pdf_is_detected_with_query_and_mixed_case() {
        assert_eq!(detect_file_type("doc.PDF"), FileKind::Pdf);
        assert_eq!(
            detect_file_type("https://x/doc.Pdf?download=1#page=2"),
            FileKind::Pdf
        );
    }

    #[test]
    fn unrecognised_input_is_unknown() {
        for input in [
            "",
            "README",
            "archive.zip",
            "https://ufs.sh/f/abc123",
            "https://x/png",
            "https://x.png/file",
            "trailing.",
            "photo.png.exe",
        ] {
            assert_eq!(detect_file_type(input), FileKind::Unknown, "{input:?}");
        }
    }

    #[test]
    fn from_accept_only_restricts_single_categories() {
        assert_eq!(
            FileKind::from_accept(AcceptedFileType::Image),
            Some(FileKind::Image)
        );
        assert_eq!(FileKind::from_accept(AcceptedFileType::All), None);
    }

    #[test]
    fn resolve_trusts_restricted_category() {
        let url = "https://ufs.sh/f/abc123";
        assert_eq!(FileKind::resolve(AcceptedFileType::Video, url), FileKind::Video);
        assert_eq!(FileKind::resolve(AcceptedFileType::All, url), FileKind::Unknown);
        assert_eq!(
            FileKind::resolve(AcceptedFileType::All, "a.webm"),
            FileKind::Video
        );
    }

    #[test]
    fn display_name_uses_last_segment() {
        assert_eq!(display_name("https://x/y/My%20File.pdf?x=1"), "My File.pdf");
        assert_eq!(display_name("https://x/y/"), "y");
        assert_eq!(display_name("plain.txt"), "plain.txt");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn mime_type_covers_known_extensions() {
        assert_eq!(mime_type("a.JPG"), Some("image/jpeg"));
        assert_eq!(mime_type("clip.mov"), Some("video/quicktime"));
        assert_eq!(mime_type("scan.pdf"), Some("application/pdf"));
        assert_eq!(mime_type("notes.txt"), None);
        assert_eq!(mime_type("README"), None);
        for ext in IMAGE_EXTENSIONS.iter().chain(VIDEO_EXTENSIONS).chain(PDF_EXTENSIONS) {
            assert!(mime_type(&format!("f.{ext}")).is_some(), "{ext}");
        }
    }

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(4 * 1024 * 1024), "4.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
