//! Open/closed state of the full-screen media overlay.
//!
//! The overlay is a two-state machine. Activation (click, Enter, Space)
//! opens it; the close button, a click outside the media, or Escape
//! close it. Everything else is ignored.

/// Inputs the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayInput {
    /// Click, Enter, or Space on the wrapped preview.
    Activate,
    /// The modal's close button.
    CloseButton,
    /// A click on the backdrop outside the media.
    OutsideClick,
    /// The Escape key.
    Escape,
}

impl OverlayInput {
    /// Map a keyboard key name (as in `KeyboardEvent.key`) to an input.
    ///
    /// Returns `None` for keys the overlay does not handle.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" | " " | "Spacebar" => Some(Self::Activate),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Whether the overlay is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    /// Only the inline preview is visible.
    #[default]
    Closed,
    /// The full-size modal is visible.
    Open,
}

impl OverlayState {
    /// The state after `input`.
    #[must_use]
    pub const fn next(self, input: OverlayInput) -> Self {
        match (self, input) {
            (Self::Closed, OverlayInput::Activate) => Self::Open,
            (
                Self::Open,
                OverlayInput::CloseButton | OverlayInput::OutsideClick | OverlayInput::Escape,
            ) => Self::Closed,
            (state, _) => state,
        }
    }

    /// Whether the modal is showing.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_activation_matches_click() {
        let by_click = OverlayState::Closed.next(OverlayInput::Activate);
        for key in ["Enter", " "] {
            let input = OverlayInput::from_key(key);
            assert_eq!(input, Some(OverlayInput::Activate), "{key:?}");
            let by_key = input.map_or(OverlayState::Closed, |i| OverlayState::Closed.next(i));
            assert_eq!(by_key, by_click, "{key:?}");
        }
        assert!(by_click.is_open());
    }

    #[test]
    fn every_close_input_closes() {
        for input in [
            OverlayInput::CloseButton,
            OverlayInput::OutsideClick,
            OverlayInput::Escape,
        ] {
            assert_eq!(OverlayState::Open.next(input), OverlayState::Closed);
        }
    }

    #[test]
    fn closed_ignores_close_inputs_and_open_ignores_activate() {
        assert_eq!(
            OverlayState::Closed.next(OverlayInput::Escape),
            OverlayState::Closed
        );
        assert_eq!(
            OverlayState::Open.next(OverlayInput::Activate),
            OverlayState::Open
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(OverlayInput::from_key("a"), None);
        assert_eq!(OverlayInput::from_key("Tab"), None);
        assert_eq!(OverlayInput::from_key("Esc"), Some(OverlayInput::Escape));
    }
}
