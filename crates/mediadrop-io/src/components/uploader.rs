//! The controlled file uploader widget.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdTrash2;
use mediadrop_core::value::normalize;
use mediadrop_core::{
    AcceptedFileType, Effect, FileKind, FileTypeRegistry, Notice, UploadError, UploadValue,
    UploadedFile, UploaderOptions, ValueChange,
};

use super::preview::FilePreview;
use super::shell::{ShellVariant, UploadButton, UploadDropzone};
use super::toast::ToastQueue;
use crate::hook::use_file_uploader;

/// Props for the [`FileUploader`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploaderProps {
    /// Accepted file category; selects the endpoint and labels.
    #[props(default)]
    accept: AcceptedFileType,
    /// Maximum number of files. Above 1 the value is a list.
    #[props(default = 1)]
    max_files: usize,
    /// The controlled value.
    #[props(default)]
    value: UploadValue,
    /// Names parallel to the value's URLs, if the parent tracks them.
    file_names: Option<Vec<String>>,
    /// Receives every new value.
    on_change: EventHandler<ValueChange>,
    /// Fired when an upload starts.
    on_upload_begin: Option<EventHandler<()>>,
    /// Fired once per file kept from a completed upload.
    on_upload_complete: Option<EventHandler<UploadedFile>>,
    /// Receives upload errors. Without it, errors become toasts.
    on_upload_error: Option<EventHandler<UploadError>>,
    /// Shell shown while there is room for files.
    #[props(default)]
    variant: ShellVariant,
    /// Overrides the registry's button or dropzone label.
    label: Option<String>,
    /// Overrides the registry's allowed-content description.
    allowed_content: Option<String>,
    /// Forces the preview kind instead of deriving it.
    kind: Option<FileKind>,
    /// Show native controls on video previews.
    #[props(default)]
    show_controls: bool,
    /// Extra classes for the outer container.
    #[props(default)]
    class: String,
}

/// Upload widget bound to a parent-owned value.
///
/// - Empty: the upload shell with the category's labels.
/// - Single file: an expandable preview with a remove button.
/// - Multiple files: a preview grid with per-file remove, "Remove all",
///   and an "Add more" button while the limit is not reached.
///
/// Errors go to `on_upload_error` when given. Otherwise they, and any
/// other notices, go to the [`ToastQueue`] in context, or are shown
/// inline when the host has none.
#[component]
pub fn FileUploader(props: FileUploaderProps) -> Element {
    let options = UploaderOptions::new(props.accept, props.max_files)
        .with_error_handler(props.on_upload_error.is_some());
    let toasts = try_use_context::<ToastQueue>();
    let registry = try_use_context::<FileTypeRegistry>().unwrap_or_default();
    let mut inline_notice = use_signal(|| Option::<Notice>::None);

    let on_change = props.on_change;
    let on_upload_begin = props.on_upload_begin;
    let on_upload_complete = props.on_upload_complete;
    let on_upload_error = props.on_upload_error;
    let on_effects = use_callback(move |effects: Vec<Effect>| {
        for effect in effects {
            match effect {
                Effect::ValueChanged(change) => on_change.call(change),
                Effect::UploadBegan => {
                    inline_notice.set(None);
                    if let Some(handler) = on_upload_begin {
                        handler.call(());
                    }
                }
                Effect::FileUploaded(file) => {
                    if let Some(handler) = on_upload_complete {
                        handler.call(file);
                    }
                }
                Effect::UploadFailed(error) => {
                    if let Some(handler) = on_upload_error {
                        handler.call(error);
                    }
                }
                Effect::Notify(notice) => match toasts {
                    Some(queue) => {
                        queue.push(notice);
                    }
                    None => inline_notice.set(Some(notice)),
                },
            }
        }
    });

    let uploader = use_file_uploader(
        options,
        props.value.clone(),
        props.file_names.clone(),
        on_effects,
    );

    let config = registry.get(props.accept);
    let files = normalize(&props.value, props.file_names.as_deref(), options.max_files);
    let allowed_content = props
        .allowed_content
        .clone()
        .unwrap_or_else(|| config.default_allowed_content.clone());
    let shell_label = props.label.clone().unwrap_or_else(|| match props.variant {
        ShellVariant::Button => config.default_label.clone(),
        ShellVariant::Dropzone => config.default_dropzone_label.clone(),
    });
    let icon = config.icon;
    let count = files.len();
    let max_files = options.max_files;

    rsx! {
        div { class: "flex flex-col gap-3 {props.class}",
            if files.is_empty() {
                {match props.variant {
                    ShellVariant::Button => rsx! {
                        UploadButton { uploader, label: shell_label, allowed_content, icon }
                    },
                    ShellVariant::Dropzone => rsx! {
                        UploadDropzone { uploader, label: shell_label, allowed_content, icon }
                    },
                }}
            } else if !options.is_multi() {
                FilePreview {
                    key: "{files[0].url}",
                    file: files[0].clone(),
                    accept: props.accept,
                    kind: props.kind,
                    show_controls: props.show_controls,
                    expandable: true,
                    on_remove: move |index| uploader.remove(index),
                }
            } else {
                div { class: "flex items-center justify-between text-sm text-(--text-secondary)",
                    span { "{count} / {max_files} files" }
                    button {
                        class: "inline-flex items-center gap-1 hover:text-(--text-error) cursor-pointer disabled:text-(--text-disabled) disabled:cursor-not-allowed",
                        disabled: uploader.is_uploading(),
                        onclick: move |_| uploader.remove_all(),
                        Icon { icon: LdTrash2, width: 14, height: 14 }
                        "Remove all"
                    }
                }
                div { class: "grid grid-cols-2 sm:grid-cols-3 gap-3",
                    for (index, file) in files.iter().enumerate() {
                        FilePreview {
                            key: "{index}-{file.url}",
                            file: file.clone(),
                            accept: props.accept,
                            kind: props.kind,
                            show_controls: props.show_controls,
                            expandable: true,
                            index,
                            on_remove: move |index| uploader.remove(index),
                        }
                    }
                }
                if uploader.can_add_more() {
                    UploadButton {
                        uploader,
                        label: props.label.clone().unwrap_or_else(|| "Add more".to_owned()),
                        icon,
                    }
                }
            }

            if let Some(notice) = inline_notice() {
                p { class: "text-sm text-(--text-error)", role: "alert", "{notice}" }
            }
        }
    }
}
