//! Preview dispatch over [`FileKind`].
//!
//! This module defines the [`PreviewRenderer`] trait: one method per
//! file kind, so a renderer that forgets a kind does not compile. The
//! UI layer implements it to produce elements; tests implement it to
//! observe which branch was taken.

use crate::config::AcceptedFileType;
use crate::detect::FileKind;
use crate::types::UploadedFile;

/// Everything a renderer needs to show one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTarget {
    /// Where the file is served from.
    pub url: String,
    /// Name to show beside icons and in `alt` text.
    pub name: String,
    /// The resolved kind.
    pub kind: FileKind,
}

impl PreviewTarget {
    /// Resolve a target for `file` shown by a widget accepting `accept`.
    ///
    /// An explicit `kind` wins over the widget category, which wins over
    /// detection from the URL (and then from the file name, since
    /// service URLs often lack an extension).
    #[must_use]
    pub fn resolve(file: &UploadedFile, accept: AcceptedFileType, kind: Option<FileKind>) -> Self {
        let kind = kind
            .or_else(|| FileKind::from_accept(accept))
            .unwrap_or_else(|| {
                match crate::detect::detect_file_type(&file.url) {
                    FileKind::Unknown => file
                        .name
                        .as_deref()
                        .map_or(FileKind::Unknown, crate::detect::detect_file_type),
                    detected => detected,
                }
            });
        Self {
            url: file.url.clone(),
            name: file.display_name(),
            kind,
        }
    }

    /// Render with `renderer`, picking the method for this target's kind.
    pub fn render<R: PreviewRenderer + ?Sized>(&self, renderer: &R) -> R::Output {
        match self.kind {
            FileKind::Image => renderer.image(self),
            FileKind::Video => renderer.video(self),
            FileKind::Pdf => renderer.pdf(self),
            FileKind::Unknown => renderer.unknown(self),
        }
    }
}

/// Renders a preview for each kind of file.
pub trait PreviewRenderer {
    /// What rendering produces (an element, a string, ...).
    type Output;

    /// Bounded-height image, contained and lazily loaded.
    fn image(&self, target: &PreviewTarget) -> Self::Output;

    /// Inline video, with a play overlay when controls are hidden.
    fn video(&self, target: &PreviewTarget) -> Self::Output;

    /// Document icon and file name. Must not fetch the document.
    fn pdf(&self, target: &PreviewTarget) -> Self::Output;

    /// Generic file icon and file name.
    fn unknown(&self, target: &PreviewTarget) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;

    impl PreviewRenderer for Tag {
        type Output = String;

        fn image(&self, t: &PreviewTarget) -> String {
            format!("img:{}", t.name)
        }
        fn video(&self, t: &PreviewTarget) -> String {
            format!("video:{}", t.name)
        }
        fn pdf(&self, t: &PreviewTarget) -> String {
            format!("pdf:{}", t.name)
        }
        fn unknown(&self, t: &PreviewTarget) -> String {
            format!("file:{}", t.name)
        }
    }

    #[test]
    fn dispatches_on_detected_kind() {
        let cases = [
            ("https://x/a.png", "img:a.png"),
            ("https://x/b.mov", "video:b.mov"),
            ("https://x/c.pdf", "pdf:c.pdf"),
            ("https://x/d.zip", "file:d.zip"),
        ];
        for (url, expected) in cases {
            let target = PreviewTarget::resolve(&UploadedFile::new(url), AcceptedFileType::All, None);
            assert_eq!(target.render(&Tag), expected, "{url}");
        }
    }

    #[test]
    fn category_beats_detection() {
        let file = UploadedFile::named("https://ufs.sh/f/k3y", "clip.mp4");
        let target = PreviewTarget::resolve(&file, AcceptedFileType::Image, None);
        assert_eq!(target.kind, FileKind::Image);
        assert_eq!(target.name, "clip.mp4");
    }

    #[test]
    fn explicit_kind_beats_category() {
        let file = UploadedFile::new("https://x/a.png");
        let target = PreviewTarget::resolve(&file, AcceptedFileType::Image, Some(FileKind::Pdf));
        assert_eq!(target.render(&Tag), "pdf:a.png");
    }

    #[test]
    fn falls_back_to_name_when_url_has_no_extension() {
        let file = UploadedFile::named("https://ufs.sh/f/k3y", "clip.webm");
        let target = PreviewTarget::resolve(&file, AcceptedFileType::All, None);
        assert_eq!(target.kind, FileKind::Video);
    }
}
