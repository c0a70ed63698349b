use dioxus::prelude::*;
use mediadrop_core::{
    AcceptedFileType, FileTypeRegistry, UploadError, UploadValue, UploadedFile, ValueChange,
};
use mediadrop_io::{FileUploader, ShellVariant, ToastHost, UploadService, use_toast_provider};
use serde::Serialize;

/// Upload service location, fixed at build time.
///
/// Unset means the service is mounted on the serving origin at the
/// default path.
const UPLOAD_URL: Option<&str> = option_env!("MEDIADROP_UPLOAD_URL");

fn main() {
    dioxus::launch(app);
}

/// Everything the demo form collects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingForm {
    avatar: UploadValue,
    gallery: UploadValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    gallery_names: Option<Vec<String>>,
    walkthrough: UploadValue,
    documents: UploadValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_names: Option<Vec<String>>,
    attachments: UploadValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment_names: Option<Vec<String>>,
}

/// Root application component.
///
/// Provides the upload service, registry, and toast queue, then renders
/// one uploader per form field alongside the live form value.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    use_context_provider(|| UPLOAD_URL.map_or_else(UploadService::default, UploadService::new));
    use_context_provider(FileTypeRegistry::default);
    use_toast_provider();

    let mut form = use_signal(ListingForm::default);
    let mut activity = use_signal(Vec::<String>::new);
    let mut document_error = use_signal(|| Option::<String>::None);

    let mut log = move |line: String| {
        let mut lines = activity.write();
        lines.push(line);
        let excess = lines.len().saturating_sub(8);
        lines.drain(..excess);
    };

    let snapshot = form.read().clone();
    let json = serde_json::to_string_pretty(&snapshot).unwrap_or_default();

    rsx! {
        document::Script { src: "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" }
        style { dangerous_inner_html: include_str!("../assets/theme.css") }

        div { class: "min-h-screen bg-(--bg) text-(--text) flex flex-col",
            header { class: "px-6 py-4 border-b border-(--border)",
                h1 { class: "text-2xl text-(--text-heading)", "mediadrop" }
                p { class: "text-(--muted) text-sm",
                    "Upload widgets for images, videos, PDFs, and anything else"
                }
            }

            div { class: "flex-1 flex flex-col lg:flex-row gap-6 p-6",
                div { class: "flex-1 grid gap-6 md:grid-cols-2 content-start",
                    Field { title: "Avatar", hint: "One image, replaced on each upload.",
                        FileUploader {
                            accept: AcceptedFileType::Image,
                            value: snapshot.avatar.clone(),
                            on_change: move |change: ValueChange| {
                                form.write().avatar = change.value;
                            },
                            on_upload_complete: move |file: UploadedFile| {
                                log(format!("avatar: {}", file.display_name()));
                            },
                        }
                    }

                    Field { title: "Gallery", hint: "Up to four images.",
                        FileUploader {
                            accept: AcceptedFileType::Image,
                            max_files: 4,
                            variant: ShellVariant::Dropzone,
                            value: snapshot.gallery.clone(),
                            file_names: snapshot.gallery_names.clone(),
                            on_change: move |change: ValueChange| {
                                let mut form = form.write();
                                form.gallery = change.value;
                                form.gallery_names = change.file_names;
                            },
                            on_upload_begin: move |()| log("gallery: upload started".to_owned()),
                        }
                    }

                    Field { title: "Walkthrough video", hint: "One clip, played inline.",
                        FileUploader {
                            accept: AcceptedFileType::Video,
                            variant: ShellVariant::Dropzone,
                            show_controls: true,
                            value: snapshot.walkthrough.clone(),
                            on_change: move |change: ValueChange| {
                                form.write().walkthrough = change.value;
                            },
                        }
                    }

                    Field { title: "Documents", hint: "Up to three PDFs. Errors are handled by the form.",
                        FileUploader {
                            accept: AcceptedFileType::Pdf,
                            max_files: 3,
                            value: snapshot.documents.clone(),
                            file_names: snapshot.document_names.clone(),
                            on_change: move |change: ValueChange| {
                                document_error.set(None);
                                let mut form = form.write();
                                form.documents = change.value;
                                form.document_names = change.file_names;
                            },
                            on_upload_error: move |error: UploadError| {
                                document_error.set(Some(error.to_string()));
                            },
                        }
                        if let Some(err) = document_error() {
                            p { class: "text-(--text-error) text-sm mt-2", "{err}" }
                        }
                    }

                    Field { title: "Attachments", hint: "Any file type, up to five.",
                        FileUploader {
                            accept: AcceptedFileType::All,
                            max_files: 5,
                            variant: ShellVariant::Dropzone,
                            value: snapshot.attachments.clone(),
                            file_names: snapshot.attachment_names.clone(),
                            on_change: move |change: ValueChange| {
                                let mut form = form.write();
                                form.attachments = change.value;
                                form.attachment_names = change.file_names;
                            },
                        }
                    }
                }

                aside { class: "lg:w-96 flex flex-col gap-4",
                    div { class: "rounded-lg border border-(--border) bg-(--surface) p-4",
                        h2 { class: "text-sm font-semibold text-(--text-heading) mb-2", "Form value" }
                        pre { class: "text-xs overflow-auto max-h-96 text-(--text-secondary)", "{json}" }
                    }
                    div { class: "rounded-lg border border-(--border) bg-(--surface) p-4",
                        h2 { class: "text-sm font-semibold text-(--text-heading) mb-2", "Activity" }
                        if activity.read().is_empty() {
                            p { class: "text-xs text-(--muted)", "Nothing yet." }
                        }
                        ul { class: "text-xs text-(--text-secondary) flex flex-col gap-1",
                            for (i, line) in activity.read().iter().enumerate() {
                                li { key: "{i}", "{line}" }
                            }
                        }
                    }
                }
            }

            ToastHost {}
        }
    }
}

/// Labelled card around one uploader.
#[component]
fn Field(title: String, hint: String, children: Element) -> Element {
    rsx! {
        section { class: "rounded-lg border border-(--border) bg-(--surface) p-4 flex flex-col gap-3",
            div {
                h2 { class: "font-semibold text-(--text-heading)", "{title}" }
                p { class: "text-(--muted) text-sm", "{hint}" }
            }
            {children}
        }
    }
}
