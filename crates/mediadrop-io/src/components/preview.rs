//! Inline preview of one uploaded file.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdFile, LdFileText, LdImageOff, LdPlay, LdX};
use mediadrop_core::{AcceptedFileType, FileKind, PreviewRenderer, PreviewTarget, UploadedFile};

use super::expandable::ExpandableMedia;

/// Props for the [`FilePreview`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FilePreviewProps {
    /// The file to show.
    file: UploadedFile,
    /// Category of the owning uploader; `None` detects the kind per file.
    accept: Option<AcceptedFileType>,
    /// Overrides both category and detection.
    kind: Option<FileKind>,
    /// Show native controls on video previews.
    #[props(default)]
    show_controls: bool,
    /// Open images and videos in a full-size overlay on activation.
    #[props(default)]
    expandable: bool,
    /// Position of the file in the uploader's value, passed to `on_remove`.
    #[props(default)]
    index: usize,
    /// Shows a remove button when set.
    on_remove: Option<EventHandler<usize>>,
}

/// Preview for an uploaded file: an image, an inline video, or an icon
/// with the file name for documents and unknown files.
///
/// Media that fails to load is replaced by a placeholder with the file
/// name, so a dead URL never leaves an empty box.
#[component]
pub fn FilePreview(props: FilePreviewProps) -> Element {
    let target = PreviewTarget::resolve(
        &props.file,
        props.accept.unwrap_or(AcceptedFileType::All),
        props.kind,
    );
    let failed_url = use_signal(|| Option::<String>::None);
    let broken = failed_url.read().as_deref() == Some(target.url.as_str());

    let renderer = InlinePreview {
        show_controls: props.show_controls,
        broken,
        failed_url,
    };
    let body = target.render(&renderer);
    let index = props.index;

    rsx! {
        div { class: "relative group rounded-lg border border-(--border) bg-(--preview-bg) overflow-hidden",
            if props.expandable && target.kind.is_expandable() && !broken {
                ExpandableMedia { target: target.clone(), {body} }
            } else {
                {body}
            }
            if let Some(on_remove) = props.on_remove {
                button {
                    class: "absolute top-2 right-2 p-1 rounded-full bg-(--surface) text-(--text-secondary) hover:text-(--text-error) shadow cursor-pointer",
                    aria_label: "Remove {target.name}",
                    title: "Remove",
                    onclick: move |evt| {
                        evt.stop_propagation();
                        on_remove.call(index);
                    },
                    Icon { icon: LdX, width: 14, height: 14 }
                }
            }
        }
    }
}

/// Renders previews at inline (form) size.
struct InlinePreview {
    show_controls: bool,
    broken: bool,
    failed_url: Signal<Option<String>>,
}

impl PreviewRenderer for InlinePreview {
    type Output = Element;

    fn image(&self, target: &PreviewTarget) -> Element {
        if self.broken {
            return broken_media(target);
        }
        let mut failed_url = self.failed_url;
        let url = target.url.clone();
        rsx! {
            img {
                class: "block w-full max-h-64 object-contain",
                src: "{target.url}",
                alt: "{target.name}",
                loading: "lazy",
                onerror: move |_| failed_url.set(Some(url.clone())),
            }
        }
    }

    fn video(&self, target: &PreviewTarget) -> Element {
        if self.broken {
            return broken_media(target);
        }
        let mut failed_url = self.failed_url;
        let url = target.url.clone();
        rsx! {
            div { class: "relative",
                video {
                    class: "block w-full max-h-64 object-contain bg-black",
                    src: "{target.url}",
                    controls: self.show_controls,
                    preload: "metadata",
                    playsinline: true,
                    onerror: move |_| failed_url.set(Some(url.clone())),
                }
                if !self.show_controls {
                    div { class: "absolute inset-0 flex items-center justify-center pointer-events-none",
                        div { class: "p-3 rounded-full bg-black/60 text-white",
                            Icon { icon: LdPlay, width: 24, height: 24 }
                        }
                    }
                }
            }
        }
    }

    fn pdf(&self, target: &PreviewTarget) -> Element {
        rsx! {
            a {
                class: "flex items-center gap-3 p-4 hover:bg-(--surface-active)",
                href: "{target.url}",
                target: "_blank",
                rel: "noopener noreferrer",
                Icon { icon: LdFileText, width: 32, height: 32, class: "shrink-0 text-(--text-error)" }
                span { class: "truncate text-sm text-(--text)", "{target.name}" }
            }
        }
    }

    fn unknown(&self, target: &PreviewTarget) -> Element {
        rsx! {
            a {
                class: "flex items-center gap-3 p-4 hover:bg-(--surface-active)",
                href: "{target.url}",
                target: "_blank",
                rel: "noopener noreferrer",
                Icon { icon: LdFile, width: 32, height: 32, class: "shrink-0 text-(--text-secondary)" }
                span { class: "truncate text-sm text-(--text)", "{target.name}" }
            }
        }
    }
}

/// Placeholder for media whose URL failed to load.
fn broken_media(target: &PreviewTarget) -> Element {
    rsx! {
        div { class: "flex items-center gap-3 p-4 text-(--text-secondary)",
            Icon { icon: LdImageOff, width: 32, height: 32, class: "shrink-0" }
            span { class: "truncate text-sm", "{target.name}" }
        }
    }
}
