//! Non-blocking notification queue.
//!
//! The host provides a [`ToastQueue`] once near the root with
//! [`use_toast_provider`] and renders a [`ToastHost`]; uploaders push
//! [`Notice`]s into it. Toasts dismiss themselves after a timeout or
//! when the user closes them.

use dioxus::logger::tracing::{error, warn};
use dioxus::dioxus_core::spawn_forever;
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdX;
use mediadrop_core::{Notice, Severity};

/// How long a toast stays on screen, in milliseconds.
const DISMISS_AFTER_MS: u32 = 6_000;

/// One queued notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Queue-unique id.
    pub id: u64,
    /// What to show.
    pub notice: Notice,
}

/// Handle to the toast queue, shared through context.
#[derive(Clone, Copy, PartialEq)]
pub struct ToastQueue {
    toasts: Signal<Vec<Toast>>,
    next_id: CopyValue<u64>,
}

impl ToastQueue {
    /// Queue a notice and schedule its dismissal. Returns the toast id.
    pub fn push(&self, notice: Notice) -> u64 {
        let mut next_id = self.next_id;
        let id = {
            let mut next = next_id.write();
            *next += 1;
            *next
        };

        match notice.severity() {
            Severity::Error => error!(id, %notice, "toast"),
            Severity::Warning => warn!(id, %notice, "toast"),
        }

        let mut toasts = self.toasts;
        toasts.write().push(Toast { id, notice });

        let queue = *self;
        spawn_forever(async move {
            gloo_timers::future::TimeoutFuture::new(DISMISS_AFTER_MS).await;
            queue.dismiss(id);
        });
        id
    }

    /// Remove a toast. Unknown ids are ignored.
    pub fn dismiss(&self, id: u64) {
        let mut toasts = self.toasts;
        if let Ok(mut list) = toasts.try_write() {
            list.retain(|t| t.id != id);
        }
    }

    /// Toasts currently shown, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.read().clone()
    }
}

/// Create the toast queue and provide it to descendants.
pub fn use_toast_provider() -> ToastQueue {
    use_context_provider(|| ToastQueue {
        toasts: Signal::new(Vec::new()),
        next_id: CopyValue::new(0),
    })
}

/// Renders the queued toasts in the bottom-right corner.
///
/// Renders nothing when no [`ToastQueue`] was provided.
#[component]
pub fn ToastHost() -> Element {
    let Some(queue) = try_use_context::<ToastQueue>() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "fixed bottom-4 right-4 z-50 flex flex-col gap-2 max-w-sm",
            role: "status",
            aria_live: "polite",
            for toast in queue.toasts() {
                ToastItem {
                    key: "{toast.id}",
                    toast: toast.clone(),
                    on_dismiss: move |id| queue.dismiss(id),
                }
            }
        }
    }
}

#[component]
fn ToastItem(toast: Toast, on_dismiss: EventHandler<u64>) -> Element {
    let accent = match toast.notice.severity() {
        Severity::Error => "border-(--text-error) text-(--text-error)",
        Severity::Warning => "border-(--text-warning) text-(--text-warning)",
    };
    let id = toast.id;

    rsx! {
        div {
            class: "flex items-start gap-3 px-4 py-3 rounded-lg border shadow-lg bg-(--surface) {accent}",
            p { class: "flex-1 text-sm", "{toast.notice}" }
            button {
                class: "shrink-0 text-(--muted) hover:text-(--text) cursor-pointer",
                aria_label: "Dismiss",
                onclick: move |_| on_dismiss.call(id),
                Icon { icon: LdX, width: 16, height: 16 }
            }
        }
    }
}
