//! Upload shells: the controls that pick files and send them.
//!
//! Both variants hand the picked files to
//! [`UseFileUploader::upload`](crate::UseFileUploader::upload) and, while
//! an upload is in flight, swap their content for a spinner and a
//! percentage bar.

use dioxus::html::HasFileData;
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdFile, LdFileText, LdImage, LdLoader, LdVideo};
use mediadrop_core::FileTypeIcon;

use crate::hook::UseFileUploader;

/// Which shell a [`FileUploader`](super::FileUploader) shows when it
/// has room for files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellVariant {
    /// Compact button.
    #[default]
    Button,
    /// Large drop target that also opens the picker on click.
    Dropzone,
}

/// Props shared by [`UploadButton`] and [`UploadDropzone`].
#[derive(Props, Clone, PartialEq)]
pub struct ShellProps {
    /// Upload state of the owning uploader.
    uploader: UseFileUploader,
    /// Button text, or the dropzone headline.
    label: String,
    /// What the service accepts, shown under the label.
    #[props(default)]
    allowed_content: String,
    /// Category icon.
    icon: FileTypeIcon,
}

/// Compact upload button.
#[component]
pub fn UploadButton(props: ShellProps) -> Element {
    let uploader = props.uploader;
    let options = uploader.options();
    let uploading = uploader.is_uploading();

    let handle_files = move |evt: FormEvent| async move {
        uploader.upload(evt.files()).await;
    };

    rsx! {
        div { class: "flex flex-col items-start gap-1",
            if uploading {
                div { class: "w-48",
                    UploadProgress { percent: uploader.upload_progress() }
                }
            } else {
                label {
                    class: "inline-flex items-center gap-2 px-4 py-2 bg-(--btn-primary) hover:bg-(--btn-primary-hover) rounded cursor-pointer text-white font-medium transition-colors",
                    input {
                        r#type: "file",
                        accept: options.accept.input_accept(),
                        multiple: options.is_multi(),
                        class: "hidden",
                        onchange: handle_files,
                    }
                    CategoryIcon { icon: props.icon, size: 18 }
                    "{props.label}"
                }
                if !props.allowed_content.is_empty() {
                    p { class: "text-(--muted) text-xs", "{props.allowed_content}" }
                }
            }
        }
    }
}

/// Drag-and-drop zone with a click-to-browse fallback.
#[component]
pub fn UploadDropzone(props: ShellProps) -> Element {
    let uploader = props.uploader;
    let options = uploader.options();
    let uploading = uploader.is_uploading();
    let mut dragging = use_signal(|| false);

    let handle_files = move |evt: FormEvent| async move {
        uploader.upload(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        if uploader.is_uploading() {
            return;
        }
        uploader.upload(evt.files()).await;
    };

    let border_class = if dragging() {
        "border-(--border-accent) bg-(--surface-active)"
    } else {
        "border-(--border-muted) bg-(--surface)"
    };

    rsx! {
        div {
            class: "border-2 border-dashed rounded-lg p-6 text-center transition-colors {border_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            if uploading {
                UploadProgress { percent: uploader.upload_progress() }
            } else {
                label { class: "flex flex-col items-center gap-2 cursor-pointer",
                    input {
                        r#type: "file",
                        accept: options.accept.input_accept(),
                        multiple: options.is_multi(),
                        class: "hidden",
                        onchange: handle_files,
                    }
                    div { class: "text-(--text-secondary)",
                        CategoryIcon { icon: props.icon, size: 36 }
                    }
                    p { class: "text-(--text) font-medium", "{props.label}" }
                    if !props.allowed_content.is_empty() {
                        p { class: "text-(--muted) text-sm", "{props.allowed_content}" }
                    }
                    if options.is_multi() {
                        p { class: "text-(--muted) text-xs",
                            "Up to {uploader.remaining_capacity()} more"
                        }
                    }
                }
            }
        }
    }
}

/// Spinner plus percentage bar.
#[component]
fn UploadProgress(percent: u8) -> Element {
    rsx! {
        div { class: "flex flex-col items-center gap-2 w-full",
            role: "progressbar",
            aria_valuemin: "0",
            aria_valuemax: "100",
            aria_valuenow: "{percent}",
            div { class: "flex items-center gap-2 text-(--text-secondary) text-sm",
                div { class: "animate-spin",
                    Icon { icon: LdLoader, width: 18, height: 18 }
                }
                "Uploading… {percent}%"
            }
            div { class: "w-full h-2 rounded bg-(--border-muted) overflow-hidden",
                div {
                    class: "h-full bg-(--btn-primary) transition-all",
                    style: "width: {percent}%",
                }
            }
        }
    }
}

#[component]
fn CategoryIcon(icon: FileTypeIcon, size: u32) -> Element {
    match icon {
        FileTypeIcon::Image => rsx! { Icon { icon: LdImage, width: size, height: size } },
        FileTypeIcon::Video => rsx! { Icon { icon: LdVideo, width: size, height: size } },
        FileTypeIcon::Pdf => rsx! { Icon { icon: LdFileText, width: size, height: size } },
        FileTypeIcon::File => rsx! { Icon { icon: LdFile, width: size, height: size } },
    }
}

