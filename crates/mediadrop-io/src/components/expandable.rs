//! Click-to-expand overlay for image and video previews.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdMaximize2, LdX};
use mediadrop_core::{OverlayInput, OverlayState, PreviewRenderer, PreviewTarget};

/// Wraps an inline preview; activating it (click, Enter, Space) opens
/// the same media at near-viewport size in a modal.
///
/// The modal closes on its close button, a click outside the media, or
/// Escape. Open state lives in this component only.
#[component]
pub fn ExpandableMedia(target: PreviewTarget, children: Element) -> Element {
    let state = use_signal(OverlayState::default);
    let name = target.name.clone();

    rsx! {
        div {
            class: "relative cursor-zoom-in focus:outline-none focus-visible:ring-2 focus-visible:ring-(--border-accent)",
            role: "button",
            tabindex: "0",
            aria_label: "Expand {name}",
            aria_haspopup: "dialog",
            onclick: move |_| transition(state, OverlayInput::Activate),
            onkeydown: move |evt| {
                if let Some(input) = OverlayInput::from_key(&evt.key().to_string()) {
                    if input == OverlayInput::Activate {
                        // Space would otherwise scroll the page.
                        evt.prevent_default();
                    }
                    transition(state, input);
                }
            },
            {children}
            div { class: "absolute bottom-2 right-2 p-1 rounded bg-black/50 text-white opacity-0 group-hover:opacity-100 transition-opacity pointer-events-none",
                Icon { icon: LdMaximize2, width: 14, height: 14 }
            }
        }

        if state().is_open() {
            div {
                class: "fixed inset-0 z-40 flex items-center justify-center p-4 bg-black/80",
                role: "dialog",
                aria_modal: "true",
                aria_label: "{name}",
                tabindex: "-1",
                onmounted: move |evt| async move {
                    let _ = evt.data().set_focus(true).await;
                },
                onclick: move |_| transition(state, OverlayInput::OutsideClick),
                onkeydown: move |evt| {
                    if OverlayInput::from_key(&evt.key().to_string()) == Some(OverlayInput::Escape) {
                        transition(state, OverlayInput::Escape);
                    }
                },
                div {
                    class: "relative max-w-[95vw] max-h-[95vh]",
                    onclick: move |evt| evt.stop_propagation(),
                    {target.render(&FullSize)}
                    button {
                        class: "absolute -top-3 -right-3 p-2 rounded-full bg-(--surface) text-(--text) shadow-lg cursor-pointer hover:bg-(--surface-active)",
                        aria_label: "Close",
                        onclick: move |evt| {
                            evt.stop_propagation();
                            transition(state, OverlayInput::CloseButton);
                        },
                        Icon { icon: LdX, width: 18, height: 18 }
                    }
                }
            }
        }
    }
}

fn transition(mut state: Signal<OverlayState>, input: OverlayInput) {
    let current = *state.peek();
    let next = current.next(input);
    if next != current {
        state.set(next);
    }
}

/// Renders the media at modal size.
struct FullSize;

impl PreviewRenderer for FullSize {
    type Output = Element;

    fn image(&self, target: &PreviewTarget) -> Element {
        rsx! {
            img {
                class: "block max-w-[95vw] max-h-[95vh] object-contain",
                src: "{target.url}",
                alt: "{target.name}",
            }
        }
    }

    fn video(&self, target: &PreviewTarget) -> Element {
        rsx! {
            video {
                class: "block max-w-[95vw] max-h-[95vh] bg-black",
                src: "{target.url}",
                controls: true,
                autoplay: true,
                playsinline: true,
            }
        }
    }

    fn pdf(&self, target: &PreviewTarget) -> Element {
        self.unknown(target)
    }

    fn unknown(&self, target: &PreviewTarget) -> Element {
        rsx! {
            a {
                class: "block p-6 rounded-lg bg-(--surface) text-(--text) underline",
                href: "{target.url}",
                target: "_blank",
                rel: "noopener noreferrer",
                "{target.name}"
            }
        }
    }
}
